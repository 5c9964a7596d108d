use ringside_client::LocalRelay;
use ringside_core::{Session, UserId};

use crate::integration::{ClientSetup, init_tracing, spawn_test_client};
use crate::utils::{EVENT_TIMEOUT_MS, RemotePeer, candidate};

#[tokio::test]
async fn test_malformed_message_dropped() {
    init_tracing();

    let relay = LocalRelay::new();
    let session = Session::initiate(UserId::new(), UserId::new());
    let remote = RemotePeer::attach(&relay, session.channel()).await.unwrap();

    let client = spawn_test_client(ClientSetup {
        relay,
        ..Default::default()
    });
    client.handle.join_session(session).await.unwrap();

    remote.send_raw(&b"{not json"[..]).await.unwrap();
    remote.send_raw(&b"[1, 2, 3]"[..]).await.unwrap();
    remote
        .send_raw(&br#"{"type":"SessionDescription","payload":{"sdp":42}}"#[..])
        .await
        .unwrap();
    remote
        .send_raw(&br#"{"type":"IceCandidate","payload":{"sdp":"candidate:1"}}"#[..])
        .await
        .unwrap();

    // A well-formed message afterwards is still handled
    remote.send_candidate(candidate(1)).await.unwrap();
    assert!(
        client
            .wait_for_snapshot(EVENT_TIMEOUT_MS, |s| s.pending_inbound == 1)
            .await
    );

    let snapshot = client.snapshot().await;
    assert!(!snapshot.has_exchanged_description());
    assert!(client.adapter.calls().await.is_empty());
    assert_eq!(client.delegate.error_count().await, 0);
}
