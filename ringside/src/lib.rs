pub use ringside_core::{Session, SessionId, UserId};

pub mod model {
    pub use ringside_core::model::*;
}

pub mod codec {
    pub use ringside_core::codec::*;
}

pub mod negotiation {
    pub use ringside_core::negotiation::*;
}

#[cfg(feature = "client")]
pub mod client {
    pub use ringside_client::*;
}
