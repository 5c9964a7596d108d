use std::time::Duration;

use ringside_core::EncodeError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("failed to subscribe to channel `{channel}`: {reason}")]
    SubscribeFailed { channel: String, reason: String },

    #[error("failed to publish on channel `{channel}`: {reason}")]
    PublishFailed { channel: String, reason: String },

    #[error("relay stopped delivering on channel `{channel}`")]
    StreamClosed { channel: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdapterError {
    #[error("remote description rejected: {0}")]
    DescriptionRejected(String),

    #[error("remote candidate rejected: {0}")]
    CandidateRejected(String),

    #[error("failed to create local description: {0}")]
    CreateFailed(String),

    #[error("data channel is not open")]
    DataChannelUnavailable,

    #[error("peer connection is closed")]
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeoutError {
    #[error("no connection within {0:?}")]
    NoConnectionWithinDeadline(Duration),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("session store unavailable: {0}")]
    Unavailable(String),

    #[error("session `{0}` not found")]
    NotFound(String),
}

#[derive(Debug, Error)]
pub enum SignalingError {
    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Adapter(#[from] AdapterError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("no active session")]
    NoActiveSession,

    #[error("signaling client is closed")]
    Closed,
}
