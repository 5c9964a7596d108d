//! Wire codec for [`SignalMessage`].
//!
//! Every message travels as a JSON envelope:
//!
//! ```text
//! { "type": "SessionDescription" | "IceCandidate" | "JoinedAck",
//!   "payload": { ... variant fields ... } }
//! ```
//!
//! Decoding reads the envelope first and dispatches on the tag, so an unknown
//! tag and a payload that does not match a known tag are reported separately.
//!
//! `sdpMLineIndex` is read as a `u16`, the width the peer connection uses
//! for media line indices. A negative index or one above 65535 decodes as
//! [`DecodeError::MalformedPayload`].

mod error;

pub use error::{DecodeError, EncodeError};

use bytes::Bytes;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::model::{JoinedAck, SignalMessage};

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    tag: String,
    #[serde(default)]
    payload: Value,
}

pub fn encode(message: &SignalMessage) -> Result<Bytes, EncodeError> {
    Ok(Bytes::from(serde_json::to_vec(message)?))
}

pub fn decode(raw: &[u8]) -> Result<SignalMessage, DecodeError> {
    let envelope: Envelope = serde_json::from_slice(raw)
        .map_err(|e| DecodeError::MalformedEnvelope(e.to_string()))?;

    match envelope.tag.as_str() {
        SignalMessage::SESSION_DESCRIPTION_TAG => {
            payload(&envelope.tag, envelope.payload).map(SignalMessage::SessionDescription)
        }
        SignalMessage::ICE_CANDIDATE_TAG => {
            payload(&envelope.tag, envelope.payload).map(SignalMessage::IceCandidate)
        }
        SignalMessage::JOINED_TAG => match envelope.payload {
            Value::Null => Ok(SignalMessage::Joined(JoinedAck::default())),
            other => payload(&envelope.tag, other).map(SignalMessage::Joined),
        },
        _ => Err(DecodeError::UnknownMessageType(envelope.tag)),
    }
}

fn payload<T: DeserializeOwned>(tag: &str, value: Value) -> Result<T, DecodeError> {
    serde_json::from_value(value).map_err(|e| DecodeError::MalformedPayload {
        tag: tag.to_owned(),
        reason: e.to_string(),
    })
}
