use async_trait::async_trait;
use bytes::Bytes;
use ringside_client::{AdapterError, PeerConnectionAdapter};
use ringside_core::{IceCandidate, SessionDescription};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::wait_helpers::poll_until;

pub const MOCK_OFFER_SDP: &str = "v=0\r\no=- 1 1 IN IP4 127.0.0.1\r\ns=mock-offer\r\n";
pub const MOCK_ANSWER_SDP: &str = "v=0\r\no=- 2 1 IN IP4 127.0.0.1\r\ns=mock-answer\r\n";

/// Calls the signaling client made on the adapter, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterCall {
    CreateOffer,
    CreateAnswer,
    SetRemoteDescription(SessionDescription),
    AddRemoteCandidate(IceCandidate),
    SendData(Bytes),
    Close,
}

#[derive(Default)]
struct Failures {
    set_remote_description: bool,
    create_answer: bool,
    send_data: bool,
    rejected_candidates: Vec<String>,
}

/// Adapter that records every call and fails on request.
#[derive(Clone, Default)]
pub struct MockAdapter {
    calls: Arc<Mutex<Vec<AdapterCall>>>,
    failures: Arc<Mutex<Failures>>,
}

impl MockAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn fail_set_remote_description(&self, fail: bool) {
        self.failures.lock().await.set_remote_description = fail;
    }

    pub async fn fail_create_answer(&self) {
        self.failures.lock().await.create_answer = true;
    }

    pub async fn fail_send_data(&self) {
        self.failures.lock().await.send_data = true;
    }

    /// Candidates whose `sdp` equals `sdp` will be rejected.
    pub async fn reject_candidate(&self, sdp: &str) {
        self.failures
            .lock()
            .await
            .rejected_candidates
            .push(sdp.to_owned());
    }

    pub async fn calls(&self) -> Vec<AdapterCall> {
        self.calls.lock().await.clone()
    }

    /// Remote candidates handed to the adapter, accepted or not.
    pub async fn applied_candidates(&self) -> Vec<IceCandidate> {
        self.calls
            .lock()
            .await
            .iter()
            .filter_map(|c| match c {
                AdapterCall::AddRemoteCandidate(candidate) => Some(candidate.clone()),
                _ => None,
            })
            .collect()
    }

    pub async fn count(&self, call: fn(&AdapterCall) -> bool) -> usize {
        self.calls.lock().await.iter().filter(|c| call(c)).count()
    }

    /// Wait until at least `count` recorded calls satisfy `call`.
    pub async fn wait_for(&self, count: usize, timeout_ms: u64, call: fn(&AdapterCall) -> bool) -> bool {
        poll_until(timeout_ms, || async move { self.count(call).await >= count }).await
    }

    async fn record(&self, call: AdapterCall) {
        tracing::debug!("[MockAdapter] {:?}", call);
        self.calls.lock().await.push(call);
    }
}

#[async_trait]
impl PeerConnectionAdapter for MockAdapter {
    async fn create_offer(&self) -> Result<SessionDescription, AdapterError> {
        self.record(AdapterCall::CreateOffer).await;
        Ok(SessionDescription::offer(MOCK_OFFER_SDP))
    }

    async fn create_answer(&self) -> Result<SessionDescription, AdapterError> {
        self.record(AdapterCall::CreateAnswer).await;
        if self.failures.lock().await.create_answer {
            return Err(AdapterError::CreateFailed("mock answer failure".into()));
        }
        Ok(SessionDescription::answer(MOCK_ANSWER_SDP))
    }

    async fn set_remote_description(&self, description: SessionDescription) -> Result<(), AdapterError> {
        self.record(AdapterCall::SetRemoteDescription(description)).await;
        if self.failures.lock().await.set_remote_description {
            return Err(AdapterError::DescriptionRejected("mock description failure".into()));
        }
        Ok(())
    }

    async fn add_remote_candidate(&self, candidate: IceCandidate) -> Result<(), AdapterError> {
        let rejected = self
            .failures
            .lock()
            .await
            .rejected_candidates
            .contains(&candidate.sdp);
        self.record(AdapterCall::AddRemoteCandidate(candidate)).await;
        if rejected {
            return Err(AdapterError::CandidateRejected("mock candidate failure".into()));
        }
        Ok(())
    }

    async fn send_data(&self, data: Bytes) -> Result<(), AdapterError> {
        self.record(AdapterCall::SendData(data)).await;
        if self.failures.lock().await.send_data {
            return Err(AdapterError::DataChannelUnavailable);
        }
        Ok(())
    }

    async fn close(&self) {
        self.record(AdapterCall::Close).await;
    }
}

pub fn is_create_offer(call: &AdapterCall) -> bool {
    matches!(call, AdapterCall::CreateOffer)
}

pub fn is_create_answer(call: &AdapterCall) -> bool {
    matches!(call, AdapterCall::CreateAnswer)
}

pub fn is_set_remote(call: &AdapterCall) -> bool {
    matches!(call, AdapterCall::SetRemoteDescription(_))
}

pub fn is_add_candidate(call: &AdapterCall) -> bool {
    matches!(call, AdapterCall::AddRemoteCandidate(_))
}

pub fn is_close(call: &AdapterCall) -> bool {
    matches!(call, AdapterCall::Close)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_adapter_records_calls() {
        let adapter = MockAdapter::new();
        adapter.reject_candidate("bad").await;

        adapter.create_offer().await.unwrap();
        assert!(adapter
            .add_remote_candidate(IceCandidate::new("bad", 0, None))
            .await
            .is_err());
        adapter.close().await;

        assert_eq!(adapter.count(is_create_offer).await, 1);
        assert_eq!(adapter.applied_candidates().await.len(), 1);
        assert_eq!(adapter.calls().await.last(), Some(&AdapterCall::Close));
    }
}
