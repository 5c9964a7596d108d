mod peer_adapter;
mod peer_config;
mod peer_event;
mod webrtc_peer;

pub use peer_adapter::PeerConnectionAdapter;
pub use peer_config::PeerConfig;
pub use peer_event::{ConnectionState, PeerEvent};
pub use webrtc_peer::WebRtcPeer;
