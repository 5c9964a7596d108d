use ringside_core::{NegotiationPhase, Session};

/// Lifecycle of one signaling client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    Idle,
    Joining,
    Starting,
    Negotiating,
    Connected,
    /// Reached through cleanup. Nothing leaves this phase.
    Closed,
}

/// Which side of the session this client plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Created the session and sends the offer.
    Initiator,
    /// Joined an existing session and answers.
    Responder,
}

/// Point-in-time view of a client's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSnapshot {
    pub phase: SessionPhase,
    pub negotiation: NegotiationPhase,
    pub pending_inbound: usize,
    pub pending_outbound: usize,
    pub session: Option<Session>,
    pub role: Option<Role>,
    pub watchdog_armed: bool,
}

impl ClientSnapshot {
    pub fn has_exchanged_description(&self) -> bool {
        self.negotiation == NegotiationPhase::DescriptionExchanged
    }
}
