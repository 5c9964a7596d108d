use thiserror::Error;

/// Why an inbound relay payload could not be turned into a [`SignalMessage`](crate::model::SignalMessage).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Not a JSON object with a string `type` field.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    #[error("unknown message type `{0}`")]
    UnknownMessageType(String),

    /// The tag was recognised but the payload does not fit its shape.
    #[error("malformed `{tag}` payload: {reason}")]
    MalformedPayload { tag: String, reason: String },
}

#[derive(Debug, Error)]
#[error("failed to encode signal message: {0}")]
pub struct EncodeError(#[from] serde_json::Error);
