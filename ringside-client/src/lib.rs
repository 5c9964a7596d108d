pub mod error;
pub mod peer;
pub mod relay;
pub mod signaling;
pub mod store;

pub use error::{AdapterError, SignalingError, StoreError, TimeoutError, TransportError};
pub use peer::{ConnectionState, PeerConfig, PeerConnectionAdapter, PeerEvent, WebRtcPeer};
pub use relay::{BROADCAST_EVENT, EventStream, LocalRelay, LocalRelayEndpoint, Relay};
pub use signaling::{
    ClientSnapshot, Role, SessionPhase, SignalingClient, SignalingConfig, SignalingDelegate,
    SignalingHandle,
};
pub use store::{MemorySessionStore, SessionStore};
