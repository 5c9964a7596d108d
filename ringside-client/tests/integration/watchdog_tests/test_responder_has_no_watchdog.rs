use std::time::Duration;

use ringside_client::SessionPhase;
use ringside_core::{Session, UserId};

use crate::integration::{ClientSetup, init_tracing, spawn_test_client};

#[tokio::test(start_paused = true)]
async fn test_responder_has_no_watchdog() {
    init_tracing();

    let client = spawn_test_client(ClientSetup::default());
    let session = Session::initiate(UserId::new(), UserId::new());
    client.handle.join_session(session).await.unwrap();

    assert!(!client.snapshot().await.watchdog_armed);

    tokio::time::sleep(Duration::from_secs(300)).await;
    assert_eq!(client.delegate.timeout_count().await, 0);
    assert_eq!(client.snapshot().await.phase, SessionPhase::Negotiating);
}
