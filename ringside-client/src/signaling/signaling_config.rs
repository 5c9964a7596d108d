use std::time::Duration;

use crate::relay::BROADCAST_EVENT;

/// Tunables for one [`SignalingClient`](crate::signaling::SignalingClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalingConfig {
    /// How long the initiator waits for the peer connection to reach
    /// `Connected` before giving up.
    pub connection_timeout: Duration,

    /// Event name every signaling message is published and subscribed under.
    pub relay_event: String,
}

impl Default for SignalingConfig {
    fn default() -> Self {
        Self {
            connection_timeout: Duration::from_secs(30),
            relay_event: BROADCAST_EVENT.to_owned(),
        }
    }
}

impl SignalingConfig {
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }
}
