use async_trait::async_trait;
use bytes::Bytes;
use ringside_core::{IceCandidate, SessionDescription};

use crate::error::AdapterError;

/// Facade over the media engine's peer connection.
///
/// The signaling client never builds one itself; the caller constructs the
/// adapter together with the `mpsc::Sender<PeerEvent>` it reports through
/// and hands both over.
#[async_trait]
pub trait PeerConnectionAdapter: Send + Sync {
    /// Creates an offer and installs it as the local description.
    async fn create_offer(&self) -> Result<SessionDescription, AdapterError>;

    /// Creates an answer to the applied remote offer and installs it as the local description.
    async fn create_answer(&self) -> Result<SessionDescription, AdapterError>;

    async fn set_remote_description(&self, description: SessionDescription) -> Result<(), AdapterError>;

    async fn add_remote_candidate(&self, candidate: IceCandidate) -> Result<(), AdapterError>;

    async fn send_data(&self, data: Bytes) -> Result<(), AdapterError>;

    /// Releases the underlying connection. Must tolerate repeated calls.
    async fn close(&self);
}
