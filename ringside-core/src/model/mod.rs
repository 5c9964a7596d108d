mod session;
mod signal;
mod user;

pub use session::{Session, SessionId};
pub use signal::{IceCandidate, JoinedAck, SdpType, SessionDescription, SignalMessage};
pub use user::UserId;
