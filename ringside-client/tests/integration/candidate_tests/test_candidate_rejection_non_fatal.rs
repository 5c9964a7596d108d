use ringside_client::{AdapterError, LocalRelay, SessionPhase, SignalingError};
use ringside_core::{Session, SessionDescription, UserId};

use crate::integration::{ClientSetup, init_tracing, spawn_test_client};
use crate::utils::{EVENT_TIMEOUT_MS, MockAdapter, RemotePeer, candidate, is_add_candidate};

#[tokio::test]
async fn test_candidate_rejection_non_fatal() {
    init_tracing();

    let relay = LocalRelay::new();
    let session = Session::initiate(UserId::new(), UserId::new());
    let remote = RemotePeer::attach(&relay, session.channel()).await.unwrap();

    let adapter = MockAdapter::new();
    adapter.reject_candidate(&candidate(1).sdp).await;

    let client = spawn_test_client(ClientSetup {
        relay,
        adapter,
        ..Default::default()
    });
    client.handle.join_session(session).await.unwrap();

    // The first is rejected while draining, the second applies after the exchange
    remote.send_candidate(candidate(1)).await.unwrap();
    remote
        .send_description(SessionDescription::offer("v=0\r\n"))
        .await
        .unwrap();
    remote.send_candidate(candidate(2)).await.unwrap();

    assert!(client.adapter.wait_for(2, EVENT_TIMEOUT_MS, is_add_candidate).await);
    assert_eq!(
        client.adapter.applied_candidates().await,
        vec![candidate(1), candidate(2)]
    );

    let rejected = client
        .delegate
        .errors_where(|e| {
            matches!(
                e,
                SignalingError::Adapter(AdapterError::CandidateRejected(_))
            )
        })
        .await;
    assert_eq!(rejected, 1);
    assert_eq!(client.snapshot().await.phase, SessionPhase::Negotiating);
}
