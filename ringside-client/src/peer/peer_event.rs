use bytes::Bytes;
use ringside_core::IceCandidate;

/// ICE connection state as reported by the peer connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    New,
    Checking,
    Connected,
    Completed,
    Disconnected,
    Failed,
    Closed,
}

impl ConnectionState {
    /// A media path has been established.
    pub fn is_connected(self) -> bool {
        matches!(self, Self::Connected | Self::Completed)
    }

    /// The peer connection will not recover from this state.
    ///
    /// `Disconnected` is left out because ICE may reconnect on its own. A
    /// remote peer that is really gone surfaces as `Failed` once ICE gives up,
    /// which is when the session is torn down.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Failed | Self::Closed)
    }
}

/// Events the peer connection raises for the signaling layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerEvent {
    /// A local ICE candidate was gathered and should reach the remote peer.
    CandidateGenerated(IceCandidate),

    ConnectionStateChanged(ConnectionState),

    /// Bytes received on the data channel.
    DataReceived(Bytes),
}
