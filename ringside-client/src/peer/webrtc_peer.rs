use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use ringside_core::{IceCandidate, SdpType, SessionDescription};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info, warn};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::data_channel::RTCDataChannel;
use webrtc::data_channel::data_channel_message::DataChannelMessage;
use webrtc::data_channel::data_channel_state::RTCDataChannelState;
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_connection_state::RTCIceConnectionState;
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;

use crate::error::AdapterError;
use crate::peer::{ConnectionState, PeerConfig, PeerConnectionAdapter, PeerEvent};

type SharedDataChannel = Arc<Mutex<Option<Arc<RTCDataChannel>>>>;

/// [`PeerConnectionAdapter`] backed by a `webrtc` peer connection carrying a
/// single data channel.
pub struct WebRtcPeer {
    peer_connection: Arc<RTCPeerConnection>,
    data_channel: SharedDataChannel,
    event_tx: mpsc::Sender<PeerEvent>,
    label: String,
    closed: AtomicBool,
}

impl WebRtcPeer {
    /// Builds the peer connection. Every callback is reported through `event_tx`.
    pub async fn new(config: PeerConfig, event_tx: mpsc::Sender<PeerEvent>) -> Result<Self> {
        let mut media_engine = MediaEngine::default();
        media_engine.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut media_engine)?;

        let api = APIBuilder::new()
            .with_media_engine(media_engine)
            .with_interceptor_registry(registry)
            .build();

        let ice_servers = if config.ice_servers.is_empty() {
            vec![]
        } else {
            vec![RTCIceServer {
                urls: config.ice_servers,
                ..Default::default()
            }]
        };

        let rtc_config = RTCConfiguration {
            ice_servers,
            ..Default::default()
        };

        let peer_connection = Arc::new(api.new_peer_connection(rtc_config).await?);
        let data_channel: SharedDataChannel = Arc::new(Mutex::new(None));

        let state_tx = event_tx.clone();
        peer_connection.on_ice_connection_state_change(Box::new(
            move |s: RTCIceConnectionState| {
                let tx = state_tx.clone();
                Box::pin(async move {
                    info!("ICE connection state changed: {}", s);
                    let _ = tx
                        .send(PeerEvent::ConnectionStateChanged(connection_state(s)))
                        .await;
                })
            },
        ));

        let ice_tx = event_tx.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let tx = ice_tx.clone();
            Box::pin(async move {
                let Some(candidate) = c else { return };
                let Ok(init) = candidate.to_json() else {
                    warn!("Dropping local candidate that cannot be serialized");
                    return;
                };
                let _ = tx
                    .send(PeerEvent::CandidateGenerated(from_candidate_init(init)))
                    .await;
            })
        }));

        let dc_tx = event_tx.clone();
        let dc_slot = data_channel.clone();
        peer_connection.on_data_channel(Box::new(move |dc: Arc<RTCDataChannel>| {
            let tx = dc_tx.clone();
            let slot = dc_slot.clone();
            Box::pin(async move {
                debug!("Remote opened data channel '{}'", dc.label());
                forward_messages(&dc, tx);
                *slot.lock().await = Some(dc);
            })
        }));

        Ok(Self {
            peer_connection,
            data_channel,
            event_tx,
            label: config.data_channel_label,
            closed: AtomicBool::new(false),
        })
    }

    /// The offering side owns the data channel; it must exist before the
    /// offer so the SDP carries an application section.
    async fn ensure_data_channel(&self) -> Result<(), AdapterError> {
        let mut slot = self.data_channel.lock().await;
        if slot.is_some() {
            return Ok(());
        }

        let dc = self
            .peer_connection
            .create_data_channel(&self.label, None)
            .await
            .map_err(|e| AdapterError::CreateFailed(e.to_string()))?;
        forward_messages(&dc, self.event_tx.clone());
        *slot = Some(dc);
        Ok(())
    }

    fn ensure_open(&self) -> Result<(), AdapterError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(AdapterError::Closed);
        }
        Ok(())
    }
}

#[async_trait]
impl PeerConnectionAdapter for WebRtcPeer {
    async fn create_offer(&self) -> Result<SessionDescription, AdapterError> {
        self.ensure_open()?;
        self.ensure_data_channel().await?;

        let offer = self
            .peer_connection
            .create_offer(None)
            .await
            .map_err(|e| AdapterError::CreateFailed(e.to_string()))?;
        self.peer_connection
            .set_local_description(offer.clone())
            .await
            .map_err(|e| AdapterError::CreateFailed(e.to_string()))?;

        Ok(SessionDescription::offer(offer.sdp))
    }

    async fn create_answer(&self) -> Result<SessionDescription, AdapterError> {
        self.ensure_open()?;

        let answer = self
            .peer_connection
            .create_answer(None)
            .await
            .map_err(|e| AdapterError::CreateFailed(e.to_string()))?;
        self.peer_connection
            .set_local_description(answer.clone())
            .await
            .map_err(|e| AdapterError::CreateFailed(e.to_string()))?;

        Ok(SessionDescription::answer(answer.sdp))
    }

    async fn set_remote_description(&self, description: SessionDescription) -> Result<(), AdapterError> {
        self.ensure_open()?;

        let desc = match description.sdp_type {
            SdpType::Offer => RTCSessionDescription::offer(description.sdp),
            SdpType::Answer => RTCSessionDescription::answer(description.sdp),
        }
        .map_err(|e| AdapterError::DescriptionRejected(e.to_string()))?;

        self.peer_connection
            .set_remote_description(desc)
            .await
            .map_err(|e| AdapterError::DescriptionRejected(e.to_string()))
    }

    async fn add_remote_candidate(&self, candidate: IceCandidate) -> Result<(), AdapterError> {
        self.ensure_open()?;

        self.peer_connection
            .add_ice_candidate(to_candidate_init(candidate))
            .await
            .map_err(|e| AdapterError::CandidateRejected(e.to_string()))
    }

    async fn send_data(&self, data: Bytes) -> Result<(), AdapterError> {
        self.ensure_open()?;

        let dc = self
            .data_channel
            .lock()
            .await
            .clone()
            .ok_or(AdapterError::DataChannelUnavailable)?;
        if dc.ready_state() != RTCDataChannelState::Open {
            return Err(AdapterError::DataChannelUnavailable);
        }

        dc.send(&data)
            .await
            .map(|_| ())
            .map_err(|_| AdapterError::DataChannelUnavailable)
    }

    async fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }

        self.data_channel.lock().await.take();
        if let Err(e) = self.peer_connection.close().await {
            warn!("Error while closing peer connection: {}", e);
        }
    }
}

fn forward_messages(dc: &Arc<RTCDataChannel>, tx: mpsc::Sender<PeerEvent>) {
    dc.on_message(Box::new(move |msg: DataChannelMessage| {
        let tx = tx.clone();
        Box::pin(async move {
            let _ = tx.send(PeerEvent::DataReceived(msg.data)).await;
        })
    }));
}

fn connection_state(state: RTCIceConnectionState) -> ConnectionState {
    match state {
        RTCIceConnectionState::Checking => ConnectionState::Checking,
        RTCIceConnectionState::Connected => ConnectionState::Connected,
        RTCIceConnectionState::Completed => ConnectionState::Completed,
        RTCIceConnectionState::Disconnected => ConnectionState::Disconnected,
        RTCIceConnectionState::Failed => ConnectionState::Failed,
        RTCIceConnectionState::Closed => ConnectionState::Closed,
        _ => ConnectionState::New,
    }
}

fn from_candidate_init(init: RTCIceCandidateInit) -> IceCandidate {
    IceCandidate::new(init.candidate, init.sdp_mline_index.unwrap_or(0), init.sdp_mid)
}

fn to_candidate_init(candidate: IceCandidate) -> RTCIceCandidateInit {
    RTCIceCandidateInit {
        candidate: candidate.sdp,
        sdp_mid: candidate.sdp_mid,
        sdp_mline_index: Some(candidate.sdp_m_line_index),
        ..Default::default()
    }
}
