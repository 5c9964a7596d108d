use ringside_client::LocalRelay;
use ringside_core::{Session, SessionDescription, UserId};

use crate::integration::{ClientSetup, init_tracing, spawn_test_client};
use crate::utils::{EVENT_TIMEOUT_MS, RemotePeer};

#[tokio::test]
async fn test_unknown_type_dropped() {
    init_tracing();

    let relay = LocalRelay::new();
    let session = Session::initiate(UserId::new(), UserId::new());
    let mut remote = RemotePeer::attach(&relay, session.channel()).await.unwrap();

    let client = spawn_test_client(ClientSetup {
        relay,
        ..Default::default()
    });
    client.handle.join_session(session).await.unwrap();
    remote.recv(EVENT_TIMEOUT_MS).await.expect("No join acknowledgement");

    remote
        .send_raw(&br#"{"type":"Hangup","payload":{}}"#[..])
        .await
        .unwrap();
    remote
        .send_description(SessionDescription::offer("v=0\r\n"))
        .await
        .unwrap();

    let answer = remote
        .recv_description(EVENT_TIMEOUT_MS)
        .await
        .expect("Session should survive an unknown message");
    assert!(!answer.is_offer());
    assert_eq!(client.delegate.error_count().await, 0);
}
