use crate::model::user::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of one negotiation lifetime. Doubles as the relay channel name.
#[derive(Debug, Serialize, Deserialize, Clone, Hash, Eq, PartialEq)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A pairing between the user who initiated the session and the peer invited to it.
#[derive(Debug, Serialize, Deserialize, Clone, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: SessionId,
    pub initiator_id: UserId,
    pub peer_id: UserId,
}

impl Session {
    /// Fresh session with a newly generated id.
    pub fn initiate(initiator_id: UserId, peer_id: UserId) -> Self {
        Self {
            id: SessionId::new(),
            initiator_id,
            peer_id,
        }
    }

    /// Relay channel carrying this session's signaling traffic.
    pub fn channel(&self) -> &str {
        self.id.as_str()
    }
}
