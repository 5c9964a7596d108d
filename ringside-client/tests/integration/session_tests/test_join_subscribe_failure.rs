use std::sync::Arc;

use ringside_client::{LocalRelay, SessionPhase, SignalingError, TransportError};
use ringside_core::{Session, UserId};

use crate::integration::{ClientSetup, init_tracing, spawn_test_client};
use crate::utils::FailingRelay;

#[tokio::test]
async fn test_join_subscribe_failure() {
    init_tracing();

    let relay = LocalRelay::new();
    let failing = FailingRelay::new(relay.endpoint());
    failing.fail_subscribe(true);

    let client = spawn_test_client(ClientSetup {
        relay: relay.clone(),
        transport: Some(Arc::new(failing.clone())),
        ..Default::default()
    });
    let session = Session::initiate(UserId::new(), UserId::new());

    let result = client.handle.join_session(session.clone()).await;
    assert!(matches!(
        result,
        Err(SignalingError::Transport(TransportError::SubscribeFailed { .. }))
    ));

    let snapshot = client.snapshot().await;
    assert_eq!(snapshot.phase, SessionPhase::Idle);
    assert_eq!(snapshot.session, None);
    assert_eq!(failing.publish_attempts(), 0);

    // The attempt can be repeated once the relay recovers
    failing.fail_subscribe(false);
    client
        .handle
        .join_session(session.clone())
        .await
        .expect("Join should succeed after recovery");
    assert_eq!(relay.subscriber_count(session.channel()), 1);
    assert_eq!(failing.publish_attempts(), 1);
}
