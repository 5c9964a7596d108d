/// Settings for [`WebRtcPeer`](crate::peer::WebRtcPeer).
#[derive(Debug, Clone)]
pub struct PeerConfig {
    pub ice_servers: Vec<String>,
    pub data_channel_label: String,
}

impl PeerConfig {
    /// Host candidates only. Enough for peers on the same machine or LAN.
    pub fn local() -> Self {
        Self {
            ice_servers: Vec::new(),
            ..Self::default()
        }
    }
}

impl Default for PeerConfig {
    fn default() -> Self {
        Self {
            ice_servers: [
                "stun:stun.l.google.com:19302",
                "stun:stun.l.google.com:5349",
                "stun:stun1.l.google.com:3478",
                "stun:stun1.l.google.com:5349",
                "stun:stun2.l.google.com:19302",
                "stun:stun2.l.google.com:5349",
                "stun:stun3.l.google.com:3478",
                "stun:stun3.l.google.com:5349",
                "stun:stun4.l.google.com:19302",
                "stun:stun4.l.google.com:5349",
            ]
            .into_iter()
            .map(str::to_owned)
            .collect(),
            data_channel_label: "WebRTCData".to_owned(),
        }
    }
}
