//! Description-exchange state machine for one session.
//!
//! Candidates can reach a peer before the session descriptions have been
//! exchanged: remote ones over the relay, local ones from the peer connection.
//! Neither can be used yet, so [`Negotiation`] parks them in two FIFO queues
//! and hands both queues back exactly once, at the moment the exchange
//! completes. After that every candidate passes straight through.
//!
//! The machine performs no I/O. Callers apply what it returns.

mod state;

pub use state::{Drained, InboundCandidate, Negotiation, NegotiationPhase, OutboundCandidate};
