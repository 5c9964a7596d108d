use std::collections::VecDeque;

use crate::model::IceCandidate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NegotiationPhase {
    AwaitingDescriptionExchange,
    /// Terminal for the lifetime of the session.
    DescriptionExchanged,
}

/// What to do with a candidate received from the remote peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundCandidate {
    Apply(IceCandidate),
    Queued { depth: usize },
}

/// What to do with a candidate gathered by the local peer connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundCandidate {
    Send(IceCandidate),
    Queued { depth: usize },
}

/// Both queues, emptied on the transition to [`NegotiationPhase::DescriptionExchanged`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[must_use = "drained candidates must be applied and sent"]
pub struct Drained {
    /// Remote candidates to apply to the peer connection, oldest first.
    pub inbound: Vec<IceCandidate>,
    /// Local candidates to publish over the relay, oldest first.
    pub outbound: Vec<IceCandidate>,
}

impl Drained {
    pub fn is_empty(&self) -> bool {
        self.inbound.is_empty() && self.outbound.is_empty()
    }
}

#[derive(Debug)]
pub struct Negotiation {
    phase: NegotiationPhase,
    pending_inbound: VecDeque<IceCandidate>,
    pending_outbound: VecDeque<IceCandidate>,
}

impl Default for Negotiation {
    fn default() -> Self {
        Self::new()
    }
}

impl Negotiation {
    pub fn new() -> Self {
        Self {
            phase: NegotiationPhase::AwaitingDescriptionExchange,
            pending_inbound: VecDeque::new(),
            pending_outbound: VecDeque::new(),
        }
    }

    pub fn phase(&self) -> NegotiationPhase {
        self.phase
    }

    pub fn has_exchanged_description(&self) -> bool {
        self.phase == NegotiationPhase::DescriptionExchanged
    }

    pub fn pending_inbound(&self) -> impl ExactSizeIterator<Item = &IceCandidate> {
        self.pending_inbound.iter()
    }

    pub fn pending_outbound(&self) -> impl ExactSizeIterator<Item = &IceCandidate> {
        self.pending_outbound.iter()
    }

    pub fn receive_candidate(&mut self, candidate: IceCandidate) -> InboundCandidate {
        match self.phase {
            NegotiationPhase::DescriptionExchanged => InboundCandidate::Apply(candidate),
            NegotiationPhase::AwaitingDescriptionExchange => {
                self.pending_inbound.push_back(candidate);
                InboundCandidate::Queued {
                    depth: self.pending_inbound.len(),
                }
            }
        }
    }

    pub fn generate_local_candidate(&mut self, candidate: IceCandidate) -> OutboundCandidate {
        match self.phase {
            NegotiationPhase::DescriptionExchanged => OutboundCandidate::Send(candidate),
            NegotiationPhase::AwaitingDescriptionExchange => {
                self.pending_outbound.push_back(candidate);
                OutboundCandidate::Queued {
                    depth: self.pending_outbound.len(),
                }
            }
        }
    }

    /// Records that a remote description has been applied.
    ///
    /// Returns the parked candidates on the first call only. Later calls
    /// (renegotiation) return `None`; the phase never reverts.
    pub fn complete_exchange(&mut self) -> Option<Drained> {
        if self.has_exchanged_description() {
            return None;
        }

        self.phase = NegotiationPhase::DescriptionExchanged;
        Some(Drained {
            inbound: self.pending_inbound.drain(..).collect(),
            outbound: self.pending_outbound.drain(..).collect(),
        })
    }

    /// Drops both queues and returns to the initial phase for a new session lifetime.
    pub fn reset(&mut self) {
        self.phase = NegotiationPhase::AwaitingDescriptionExchange;
        self.pending_inbound.clear();
        self.pending_outbound.clear();
    }
}
