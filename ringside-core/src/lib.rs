//! Transport-agnostic pieces of the ringside signaling protocol: the session
//! model, the relay wire codec and the description-exchange state machine.

pub mod codec;
pub mod model;
pub mod negotiation;

pub use codec::{DecodeError, EncodeError, decode, encode};
pub use model::{
    IceCandidate, JoinedAck, SdpType, Session, SessionDescription, SessionId, SignalMessage,
    UserId,
};
pub use negotiation::{Drained, InboundCandidate, Negotiation, NegotiationPhase, OutboundCandidate};
