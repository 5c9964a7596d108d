use async_trait::async_trait;
use bytes::Bytes;
use ringside_core::Session;

use crate::error::SignalingError;
use crate::peer::ConnectionState;

/// Callbacks through which a [`SignalingClient`](crate::signaling::SignalingClient)
/// reports to the application.
///
/// All methods are invoked from the client's own task, one at a time.
#[async_trait]
pub trait SignalingDelegate: Send + Sync + 'static {
    /// The initiator's watchdog expired before the connection was established.
    /// Called at most once per armed watchdog; cleanup follows immediately.
    async fn on_timeout(&self);

    /// A relay, store or adapter call failed. The session is left running.
    async fn on_error(&self, error: SignalingError);

    async fn on_connection_state_changed(&self, state: ConnectionState);

    /// The initiator persisted a new session and is waiting for the peer.
    async fn on_session_created(&self, _session: &Session) {}

    /// Bytes received on the peer data channel.
    async fn on_data_received(&self, _data: Bytes) {}
}
