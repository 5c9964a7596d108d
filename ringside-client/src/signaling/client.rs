use std::sync::Arc;

use bytes::Bytes;
use futures::StreamExt;
use ringside_core::{
    Drained, IceCandidate, InboundCandidate, Negotiation, OutboundCandidate, Session,
    SessionDescription, SignalMessage, UserId, codec,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::error::{SignalingError, TimeoutError, TransportError};
use crate::peer::{ConnectionState, PeerConnectionAdapter, PeerEvent};
use crate::relay::{EventStream, Relay};
use crate::signaling::client_command::ClientCommand;
use crate::signaling::watchdog::{Watchdog, WatchdogFired};
use crate::signaling::{
    ClientSnapshot, Role, SessionPhase, SignalingConfig, SignalingDelegate, SignalingHandle,
};
use crate::store::SessionStore;

const COMMAND_BUFFER: usize = 32;

/// Drives the signaling for one session between two peers.
///
/// The client owns the relay subscription, the negotiation queues and the
/// connection watchdog. Every entry point takes `&mut self`, so running it
/// through [`run`](Self::run) or [`spawn`](Self::spawn) serialises relay
/// messages, adapter events, watchdog firings and caller commands.
pub struct SignalingClient {
    user_id: UserId,
    config: SignalingConfig,

    relay: Arc<dyn Relay>,
    store: Arc<dyn SessionStore>,
    adapter: Arc<dyn PeerConnectionAdapter>,
    delegate: Arc<dyn SignalingDelegate>,

    session: Option<Session>,
    role: Option<Role>,
    phase: SessionPhase,
    negotiation: Negotiation,
    watchdog: Watchdog,

    /// Messages arriving on the current session channel.
    relay_events: Option<EventStream>,
}

impl SignalingClient {
    pub fn new(
        user_id: UserId,
        config: SignalingConfig,
        relay: Arc<dyn Relay>,
        store: Arc<dyn SessionStore>,
        adapter: Arc<dyn PeerConnectionAdapter>,
        delegate: Arc<dyn SignalingDelegate>,
    ) -> Self {
        let watchdog = Watchdog::new(config.connection_timeout);

        Self {
            user_id,
            config,
            relay,
            store,
            adapter,
            delegate,
            session: None,
            role: None,
            phase: SessionPhase::Idle,
            negotiation: Negotiation::new(),
            watchdog,
            relay_events: None,
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_closed(&self) -> bool {
        self.phase == SessionPhase::Closed
    }

    pub fn snapshot(&self) -> ClientSnapshot {
        ClientSnapshot {
            phase: self.phase,
            negotiation: self.negotiation.phase(),
            pending_inbound: self.negotiation.pending_inbound().len(),
            pending_outbound: self.negotiation.pending_outbound().len(),
            session: self.session.clone(),
            role: self.role,
            watchdog_armed: self.watchdog.is_armed(),
        }
    }

    /// Responding side: listens on the session channel and tells the
    /// initiator it is there.
    ///
    /// A failed subscription is returned and leaves the client idle. A failed
    /// acknowledgement goes to [`SignalingDelegate::on_error`].
    pub async fn join_session(&mut self, session: Session) -> Result<(), SignalingError> {
        self.ensure_open()?;
        self.leave_current_session().await;

        info!("Joining session {}", session.id);
        self.phase = SessionPhase::Joining;

        let events = match self
            .relay
            .subscribe(session.channel(), &self.config.relay_event)
            .await
        {
            Ok(events) => events,
            Err(e) => {
                error!("Failed to join session {}: {}", session.id, e);
                self.phase = SessionPhase::Idle;
                return Err(e.into());
            }
        };

        self.relay_events = Some(events);
        self.session = Some(session);
        self.role = Some(Role::Responder);
        self.phase = SessionPhase::Negotiating;

        self.broadcast(SignalMessage::joined()).await;
        Ok(())
    }

    /// Initiating side: creates and persists a session with `peer_id`,
    /// listens on its channel and arms the connection watchdog.
    ///
    /// Store failures are reported to the delegate without aborting; a failed
    /// subscription is returned and leaves the client idle.
    pub async fn start_session(&mut self, peer_id: UserId) -> Result<Session, SignalingError> {
        self.ensure_open()?;
        self.leave_current_session().await;

        let session = Session::initiate(self.user_id, peer_id);
        info!("Starting session {} with {}", session.id, peer_id);
        self.phase = SessionPhase::Starting;

        if let Err(e) = self.store.create_session(&session).await {
            warn!("Failed to persist session {}: {}", session.id, e);
            self.report(e.into()).await;
        }
        if let Err(e) = self.store.add_participant(&session.id, &peer_id).await {
            warn!("Failed to add {} to session {}: {}", peer_id, session.id, e);
            self.report(e.into()).await;
        }

        let events = match self
            .relay
            .subscribe(session.channel(), &self.config.relay_event)
            .await
        {
            Ok(events) => events,
            Err(e) => {
                error!("Failed to open session {}: {}", session.id, e);
                self.phase = SessionPhase::Idle;
                return Err(e.into());
            }
        };

        self.relay_events = Some(events);
        self.session = Some(session.clone());
        self.role = Some(Role::Initiator);
        self.phase = SessionPhase::Negotiating;
        self.watchdog.arm();

        self.delegate.on_session_created(&session).await;
        Ok(session)
    }

    /// Handles one raw payload from the session channel. Undecodable
    /// payloads are logged and dropped.
    pub async fn on_relay_message(&mut self, raw: &[u8]) {
        if self.is_closed() {
            debug!("Ignoring relay message after cleanup");
            return;
        }

        let message = match codec::decode(raw) {
            Ok(message) => message,
            Err(e) => {
                warn!("Dropping relay message: {}", e);
                return;
            }
        };
        debug!("Received {} message", message.tag());

        match message {
            SignalMessage::Joined(_) => self.on_peer_joined().await,
            SignalMessage::SessionDescription(description) => {
                self.on_remote_description(description).await
            }
            SignalMessage::IceCandidate(candidate) => self.on_remote_candidate(candidate).await,
        }
    }

    pub async fn on_peer_event(&mut self, event: PeerEvent) {
        if self.is_closed() {
            debug!("Ignoring peer event after cleanup: {:?}", event);
            return;
        }

        match event {
            PeerEvent::CandidateGenerated(candidate) => self.on_local_candidate(candidate).await,
            PeerEvent::ConnectionStateChanged(state) => {
                self.on_connection_state_changed(state).await
            }
            PeerEvent::DataReceived(data) => self.delegate.on_data_received(data).await,
        }
    }

    pub async fn on_local_candidate(&mut self, candidate: IceCandidate) {
        if self.is_closed() {
            return;
        }

        match self.negotiation.generate_local_candidate(candidate) {
            OutboundCandidate::Send(candidate) => self.broadcast(candidate.into()).await,
            OutboundCandidate::Queued { depth } => {
                debug!("Queued local candidate ({} pending)", depth)
            }
        }
    }

    /// Forwards `state` to the delegate. A connected state stops the
    /// watchdog; `Failed` and `Closed` end the session.
    pub async fn on_connection_state_changed(&mut self, state: ConnectionState) {
        if self.is_closed() {
            return;
        }

        info!("Connection state changed: {:?}", state);
        self.delegate.on_connection_state_changed(state).await;

        if state.is_connected() {
            if self.watchdog.cancel() {
                info!("Connected before the deadline, watchdog cancelled");
            }
            self.phase = SessionPhase::Connected;
        } else if state.is_terminal() {
            self.cleanup().await;
        }
    }

    /// Sends `data` over the peer data channel.
    pub async fn send_data(&mut self, data: Bytes) -> Result<(), SignalingError> {
        self.ensure_open()?;
        if self.session.is_none() {
            return Err(SignalingError::NoActiveSession);
        }

        self.adapter.send_data(data).await?;
        Ok(())
    }

    /// Cancels the watchdog, drops both candidate queues, leaves the relay
    /// channel and closes the adapter. Calling it again does nothing.
    pub async fn cleanup(&mut self) {
        if self.is_closed() {
            debug!("Client already cleaned up");
            return;
        }

        info!("Cleaning up signaling client for {}", self.user_id);
        self.leave_current_session().await;
        self.adapter.close().await;
        self.phase = SessionPhase::Closed;
    }

    /// Event loop. Returns once the client has cleaned up, or after all
    /// handles are gone.
    pub async fn run(
        mut self,
        mut command_rx: mpsc::Receiver<ClientCommand>,
        peer_events: mpsc::Receiver<PeerEvent>,
    ) {
        info!("Signaling client {} started", self.user_id);
        let mut peer_events = Some(peer_events);

        loop {
            tokio::select! {
                cmd = command_rx.recv() => {
                    match cmd {
                        Some(c) => self.handle_command(c).await,
                        None => {
                            info!("All handles dropped, shutting down");
                            self.cleanup().await;
                        }
                    }
                }

                raw = next_relay_message(&mut self.relay_events) => {
                    match raw {
                        Some(raw) => self.on_relay_message(&raw).await,
                        None => self.on_relay_stream_closed().await,
                    }
                }

                evt = next_peer_event(&mut peer_events) => {
                    match evt {
                        Some(e) => self.on_peer_event(e).await,
                        None => {
                            debug!("Peer event channel closed");
                            peer_events = None;
                        }
                    }
                }

                fired = self.watchdog.fired() => self.on_watchdog_fired(fired).await,
            }

            if self.is_closed() {
                break;
            }
        }

        info!("Signaling client {} finished", self.user_id);
    }

    /// Moves the client onto its own task.
    pub fn spawn(self, peer_events: mpsc::Receiver<PeerEvent>) -> SignalingHandle {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        tokio::spawn(self.run(command_rx, peer_events));
        SignalingHandle::new(command_tx)
    }

    async fn handle_command(&mut self, cmd: ClientCommand) {
        match cmd {
            ClientCommand::JoinSession { session, reply } => {
                let _ = reply.send(self.join_session(session).await);
            }
            ClientCommand::StartSession { peer_id, reply } => {
                let _ = reply.send(self.start_session(peer_id).await);
            }
            ClientCommand::SendData { data, reply } => {
                let _ = reply.send(self.send_data(data).await);
            }
            ClientCommand::Snapshot { reply } => {
                let _ = reply.send(self.snapshot());
            }
            ClientCommand::Cleanup { reply } => {
                self.cleanup().await;
                let _ = reply.send(());
            }
        }
    }

    async fn on_watchdog_fired(&mut self, fired: WatchdogFired) {
        if !self.watchdog.claim(fired) || self.is_closed() {
            return;
        }

        let timeout = TimeoutError::NoConnectionWithinDeadline(self.watchdog.timeout());
        warn!("Session timed out: {}", timeout);
        self.delegate.on_timeout().await;
        self.cleanup().await;
    }

    /// The subscription ended without `leave_current_session` dropping it.
    /// Reported once; the session stays open for the caller to decide.
    async fn on_relay_stream_closed(&mut self) {
        self.relay_events = None;

        let Some(channel) = self.session.as_ref().map(|s| s.channel().to_owned()) else {
            debug!("Relay stream ended with no active session");
            return;
        };

        warn!("Relay stream for {} ended", channel);
        self.report(TransportError::StreamClosed { channel }.into()).await;
    }

    async fn on_peer_joined(&mut self) {
        if self.role != Some(Role::Initiator) {
            debug!("Ignoring join acknowledgement, not the initiator");
            return;
        }

        info!("Peer joined, creating offer");
        match self.adapter.create_offer().await {
            Ok(offer) => self.broadcast(offer.into()).await,
            Err(e) => {
                error!("Failed to create offer: {}", e);
                self.report(e.into()).await;
            }
        }
    }

    /// Applies the remote description, answers offers and, the first time
    /// only, releases both candidate queues. On failure the queues stay put.
    async fn on_remote_description(&mut self, description: SessionDescription) {
        let is_offer = description.is_offer();
        info!("Applying remote {:?}", description.sdp_type);

        if let Err(e) = self.adapter.set_remote_description(description).await {
            error!("Failed to apply remote description: {}", e);
            self.report(e.into()).await;
            return;
        }

        if is_offer {
            match self.adapter.create_answer().await {
                Ok(answer) => self.broadcast(answer.into()).await,
                Err(e) => {
                    error!("Failed to create answer: {}", e);
                    self.report(e.into()).await;
                    return;
                }
            }
        }

        match self.negotiation.complete_exchange() {
            Some(drained) => self.drain(drained).await,
            None => debug!("Description renegotiated, nothing left to drain"),
        }
    }

    async fn on_remote_candidate(&mut self, candidate: IceCandidate) {
        match self.negotiation.receive_candidate(candidate) {
            InboundCandidate::Apply(candidate) => self.apply_remote_candidate(candidate).await,
            InboundCandidate::Queued { depth } => {
                debug!("Queued remote candidate ({} pending)", depth)
            }
        }
    }

    async fn drain(&mut self, drained: Drained) {
        info!(
            "Description exchanged, draining {} remote and {} local candidates",
            drained.inbound.len(),
            drained.outbound.len()
        );

        for candidate in drained.inbound {
            self.apply_remote_candidate(candidate).await;
        }
        for candidate in drained.outbound {
            self.broadcast(candidate.into()).await;
        }
    }

    /// Rejected candidates are reported but never end the session.
    async fn apply_remote_candidate(&mut self, candidate: IceCandidate) {
        if let Err(e) = self.adapter.add_remote_candidate(candidate).await {
            warn!("Failed to add remote candidate: {}", e);
            self.report(e.into()).await;
        }
    }

    /// Publishes `message` on the current session channel, reporting failures.
    async fn broadcast(&mut self, message: SignalMessage) {
        let Some(channel) = self.session.as_ref().map(|s| s.channel().to_owned()) else {
            warn!("No active session, dropping {} message", message.tag());
            return;
        };

        let payload = match codec::encode(&message) {
            Ok(payload) => payload,
            Err(e) => {
                error!("Failed to encode {} message: {}", message.tag(), e);
                self.report(e.into()).await;
                return;
            }
        };

        debug!("Publishing {} message on {}", message.tag(), channel);
        if let Err(e) = self
            .relay
            .publish(&channel, &self.config.relay_event, payload)
            .await
        {
            warn!("Failed to publish {} message: {}", message.tag(), e);
            self.report(e.into()).await;
        }
    }

    async fn report(&mut self, error: SignalingError) {
        self.delegate.on_error(error).await;
    }

    /// Forgets the current session: timer, queues and channel.
    async fn leave_current_session(&mut self) {
        self.watchdog.cancel();
        self.negotiation.reset();
        self.relay_events = None;
        self.role = None;

        if let Some(previous) = self.session.take() {
            debug!("Leaving session {}", previous.id);
            self.relay.unsubscribe(previous.channel()).await;
        }
    }

    fn ensure_open(&self) -> Result<(), SignalingError> {
        if self.is_closed() {
            return Err(SignalingError::Closed);
        }
        Ok(())
    }
}

async fn next_relay_message(events: &mut Option<EventStream>) -> Option<Bytes> {
    match events {
        Some(stream) => stream.next().await,
        None => std::future::pending().await,
    }
}

async fn next_peer_event(events: &mut Option<mpsc::Receiver<PeerEvent>>) -> Option<PeerEvent> {
    match events {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
