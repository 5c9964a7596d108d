use anyhow::{Context, Result, bail};
use bytes::Bytes;
use futures::StreamExt;
use ringside_client::{BROADCAST_EVENT, EventStream, LocalRelay, LocalRelayEndpoint, Relay};
use ringside_core::{IceCandidate, SessionDescription, SignalMessage, codec};
use std::time::Duration;

/// The far side of a session, scripted by hand over the local relay.
pub struct RemotePeer {
    endpoint: LocalRelayEndpoint,
    channel: String,
    events: EventStream,
}

impl RemotePeer {
    /// Subscribes a fresh endpoint to `channel`.
    pub async fn attach(relay: &LocalRelay, channel: &str) -> Result<Self> {
        let endpoint = relay.endpoint();
        let events = endpoint
            .subscribe(channel, BROADCAST_EVENT)
            .await
            .context("Failed to subscribe remote peer")?;

        Ok(Self {
            endpoint,
            channel: channel.to_owned(),
            events,
        })
    }

    pub async fn send(&self, message: SignalMessage) -> Result<()> {
        let payload = codec::encode(&message).context("Failed to encode message")?;
        self.send_raw(payload).await
    }

    pub async fn send_raw(&self, payload: impl Into<Bytes>) -> Result<()> {
        self.endpoint
            .publish(&self.channel, BROADCAST_EVENT, payload.into())
            .await
            .context("Failed to publish")
    }

    pub async fn send_joined(&self) -> Result<()> {
        self.send(SignalMessage::joined()).await
    }

    pub async fn send_candidate(&self, candidate: IceCandidate) -> Result<()> {
        self.send(candidate.into()).await
    }

    pub async fn send_description(&self, description: SessionDescription) -> Result<()> {
        self.send(description.into()).await
    }

    /// Next message the client published, within `timeout_ms`.
    pub async fn recv(&mut self, timeout_ms: u64) -> Result<SignalMessage> {
        let raw = tokio::time::timeout(Duration::from_millis(timeout_ms), self.events.next())
            .await
            .context("Timeout waiting for relay message")?
            .context("Relay stream closed")?;

        codec::decode(&raw).context("Client published an undecodable message")
    }

    pub async fn recv_description(&mut self, timeout_ms: u64) -> Result<SessionDescription> {
        match self.recv(timeout_ms).await? {
            SignalMessage::SessionDescription(description) => Ok(description),
            other => bail!("Expected SessionDescription, got {}", other.tag()),
        }
    }

    /// Collects candidates until none arrives for `timeout_ms`.
    pub async fn recv_candidates(&mut self, timeout_ms: u64) -> Vec<IceCandidate> {
        let mut candidates = Vec::new();
        while let Ok(SignalMessage::IceCandidate(candidate)) = self.recv(timeout_ms).await {
            candidates.push(candidate);
        }
        candidates
    }

    /// `true` if the client publishes nothing for `timeout_ms`.
    pub async fn is_silent_for(&mut self, timeout_ms: u64) -> bool {
        self.recv(timeout_ms).await.is_err()
    }
}

/// Candidate `n` with a recognisable `sdp` line.
pub fn candidate(n: u16) -> IceCandidate {
    IceCandidate::new(
        format!("candidate:{n} 1 udp 2130706431 192.0.2.{n} 5000 typ host"),
        0,
        Some("0".into()),
    )
}
