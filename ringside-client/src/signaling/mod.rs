//! The signaling client: exchanges session descriptions and ICE candidates
//! with the remote peer over a relay channel until the peer connection is up.

mod client;
mod client_command;
mod delegate;
mod handle;
mod signaling_config;
mod snapshot;
mod watchdog;

pub use client::SignalingClient;
pub use client_command::{ClientCommand, Reply};
pub use delegate::SignalingDelegate;
pub use handle::SignalingHandle;
pub use signaling_config::SignalingConfig;
pub use snapshot::{ClientSnapshot, Role, SessionPhase};
pub use watchdog::{Watchdog, WatchdogFired};
