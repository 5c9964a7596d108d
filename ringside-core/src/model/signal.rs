use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SdpType {
    Offer,
    Answer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDescription {
    #[serde(rename = "type")]
    pub sdp_type: SdpType,
    pub sdp: String,
}

impl SessionDescription {
    pub fn offer(sdp: impl Into<String>) -> Self {
        Self {
            sdp_type: SdpType::Offer,
            sdp: sdp.into(),
        }
    }

    pub fn answer(sdp: impl Into<String>) -> Self {
        Self {
            sdp_type: SdpType::Answer,
            sdp: sdp.into(),
        }
    }

    pub fn is_offer(&self) -> bool {
        self.sdp_type == SdpType::Offer
    }
}

/// One network path a peer might be reachable on. Used for both remote
/// candidates received over the relay and locally gathered ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IceCandidate {
    pub sdp: String,
    pub sdp_m_line_index: u16,
    pub sdp_mid: Option<String>,
}

impl IceCandidate {
    pub fn new(sdp: impl Into<String>, sdp_m_line_index: u16, sdp_mid: Option<String>) -> Self {
        Self {
            sdp: sdp.into(),
            sdp_m_line_index,
            sdp_mid,
        }
    }
}

/// Sent by the responding side once it is listening on the session channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinedAck {}

/// Everything that travels over the relay for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "payload")]
pub enum SignalMessage {
    #[serde(rename = "JoinedAck")]
    Joined(JoinedAck),
    SessionDescription(SessionDescription),
    IceCandidate(IceCandidate),
}

impl SignalMessage {
    pub const JOINED_TAG: &'static str = "JoinedAck";
    pub const SESSION_DESCRIPTION_TAG: &'static str = "SessionDescription";
    pub const ICE_CANDIDATE_TAG: &'static str = "IceCandidate";

    pub fn joined() -> Self {
        Self::Joined(JoinedAck::default())
    }

    /// Wire discriminator of this variant.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Joined(_) => Self::JOINED_TAG,
            Self::SessionDescription(_) => Self::SESSION_DESCRIPTION_TAG,
            Self::IceCandidate(_) => Self::ICE_CANDIDATE_TAG,
        }
    }
}

impl From<SessionDescription> for SignalMessage {
    fn from(description: SessionDescription) -> Self {
        Self::SessionDescription(description)
    }
}

impl From<IceCandidate> for SignalMessage {
    fn from(candidate: IceCandidate) -> Self {
        Self::IceCandidate(candidate)
    }
}
