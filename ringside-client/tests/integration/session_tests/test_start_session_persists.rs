use ringside_client::SessionPhase;
use ringside_core::UserId;

use crate::integration::{ClientSetup, init_tracing, spawn_test_client};

#[tokio::test]
async fn test_start_session_persists() {
    init_tracing();

    let client = spawn_test_client(ClientSetup::default());
    let peer_id = UserId::new();

    let session = client.handle.start_session(peer_id).await.unwrap();

    assert_eq!(client.store.session(&session.id), Some(session.clone()));
    assert_eq!(client.store.participants(&session.id), vec![peer_id]);
    assert_eq!(client.delegate.sessions_created().await, vec![session.clone()]);
    assert_eq!(client.relay.subscriber_count(session.channel()), 1);

    let snapshot = client.snapshot().await;
    assert_eq!(snapshot.phase, SessionPhase::Negotiating);
    assert!(snapshot.watchdog_armed);
    assert!(!snapshot.has_exchanged_description());
}

#[tokio::test]
async fn test_restart_leaves_previous_channel() {
    init_tracing();

    let client = spawn_test_client(ClientSetup::default());

    let first = client.handle.start_session(UserId::new()).await.unwrap();
    let second = client.handle.start_session(UserId::new()).await.unwrap();

    assert_ne!(first.id, second.id);
    assert_eq!(client.relay.subscriber_count(first.channel()), 0);
    assert_eq!(client.relay.subscriber_count(second.channel()), 1);
    assert_eq!(client.store.len(), 2);
}
