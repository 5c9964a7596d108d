use std::sync::Arc;

use ringside_client::{SignalingError, StoreError};
use ringside_core::UserId;

use crate::integration::{ClientSetup, init_tracing, spawn_test_client};
use crate::utils::UnavailableStore;

#[tokio::test]
async fn test_store_failure_reported() {
    init_tracing();

    let client = spawn_test_client(ClientSetup {
        store: Some(Arc::new(UnavailableStore)),
        ..Default::default()
    });

    let session = client
        .handle
        .start_session(UserId::new())
        .await
        .expect("Store failures must not abort the session");

    let store_errors = client
        .delegate
        .errors_where(|e| matches!(e, SignalingError::Store(StoreError::Unavailable(_))))
        .await;
    assert_eq!(store_errors, 2);

    // Still listening and waiting for the peer
    assert_eq!(client.relay.subscriber_count(session.channel()), 1);
    assert!(client.snapshot().await.watchdog_armed);
}
