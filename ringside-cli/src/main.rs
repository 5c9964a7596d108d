use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use bytes::Bytes;
use clap::{Parser, Subcommand};
use colored::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use ringside::client::{
    AdapterError, ConnectionState, LocalRelay, MemorySessionStore, PeerConfig, SignalingClient,
    SignalingConfig, SignalingDelegate, SignalingError, SignalingHandle, WebRtcPeer,
};
use ringside::{Session, UserId};

#[derive(Parser)]
#[command(name = "ringside")]
#[command(about = "Peer-to-peer session signaling over a relay channel")]
struct Cli {
    /// Log debug output from the signaling clients.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Negotiates two in-process peers over a local relay and exchanges one message.
    Demo {
        /// Seconds the initiator waits for the connection.
        #[arg(long, default_value_t = 30)]
        timeout_secs: u64,

        /// STUN/TURN server URL. Repeatable; none means host candidates only.
        #[arg(long = "ice-server")]
        ice_servers: Vec<String>,

        #[arg(short, long, default_value = "hello from the initiator")]
        message: String,
    },
}

#[derive(Debug)]
enum DemoEvent {
    SessionCreated(Session),
    StateChanged(&'static str, ConnectionState),
    DataReceived(&'static str, Bytes),
    Error(&'static str, String),
    TimedOut(&'static str),
}

/// Prints what one side sees and forwards it to the demo driver.
struct DemoDelegate {
    name: &'static str,
    events: mpsc::UnboundedSender<DemoEvent>,
}

#[async_trait]
impl SignalingDelegate for DemoDelegate {
    async fn on_timeout(&self) {
        println!("{} {}", self.tag(), "timed out waiting for the peer".red());
        let _ = self.events.send(DemoEvent::TimedOut(self.name));
    }

    async fn on_error(&self, error: SignalingError) {
        println!("{} {}", self.tag(), error.to_string().red());
        let _ = self.events.send(DemoEvent::Error(self.name, error.to_string()));
    }

    async fn on_connection_state_changed(&self, state: ConnectionState) {
        println!("{} ICE {}", self.tag(), format!("{:?}", state).yellow());
        let _ = self.events.send(DemoEvent::StateChanged(self.name, state));
    }

    async fn on_session_created(&self, session: &Session) {
        println!("{} created session {}", self.tag(), session.id.to_string().cyan());
        let _ = self.events.send(DemoEvent::SessionCreated(session.clone()));
    }

    async fn on_data_received(&self, data: Bytes) {
        let _ = self.events.send(DemoEvent::DataReceived(self.name, data));
    }
}

impl DemoDelegate {
    fn tag(&self) -> ColoredString {
        format!("[{}]", self.name).bold()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Demo {
            timeout_secs,
            ice_servers,
            message,
        } => run_demo(Duration::from_secs(timeout_secs), ice_servers, message).await,
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "ringside_client=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run_demo(timeout: Duration, ice_servers: Vec<String>, message: String) -> Result<()> {
    println!("{}", "Starting loopback session...".green().bold());

    let relay = LocalRelay::new();
    let store = MemorySessionStore::new();
    let signaling_config = SignalingConfig::default().with_connection_timeout(timeout);
    let peer_config = PeerConfig {
        ice_servers,
        ..PeerConfig::default()
    };
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();

    let alice_id = UserId::new();
    let bob_id = UserId::new();

    let alice = spawn_side(
        "initiator",
        alice_id,
        &relay,
        &store,
        &signaling_config,
        &peer_config,
        events_tx.clone(),
    )
    .await?;
    let bob = spawn_side(
        "responder",
        bob_id,
        &relay,
        &store,
        &signaling_config,
        &peer_config,
        events_tx,
    )
    .await?;

    let session = alice
        .start_session(bob_id)
        .await
        .context("Failed to start session")?;
    debug!("Participants: {:?}", store.participants(&session.id));
    bob.join_session(session)
        .await
        .context("Failed to join session")?;

    let mut connected = Vec::new();
    let outcome = tokio::time::timeout(timeout, async {
        while let Some(event) = events_rx.recv().await {
            match event {
                DemoEvent::StateChanged(name, state) if state.is_connected() => {
                    if !connected.contains(&name) {
                        connected.push(name);
                    }
                    if connected.len() == 2 {
                        return Ok(());
                    }
                }
                DemoEvent::StateChanged(name, state) if state.is_terminal() => {
                    bail!("{} peer connection ended: {:?}", name, state)
                }
                DemoEvent::TimedOut(name) => bail!("{} timed out", name),
                DemoEvent::Error(name, reason) => debug!("{} reported: {}", name, reason),
                DemoEvent::SessionCreated(session) => debug!("Session {} announced", session.id),
                other => debug!("Demo event: {:?}", other),
            }
        }
        bail!("Both clients stopped before connecting")
    })
    .await;

    match outcome {
        Ok(result) => result?,
        Err(_) => bail!("Peers did not connect within {:?}", timeout),
    }
    println!("{}", "Both peers connected.".green().bold());

    send_when_open(&alice, Bytes::from(message.clone())).await?;

    let received = tokio::time::timeout(Duration::from_secs(5), async {
        while let Some(event) = events_rx.recv().await {
            if let DemoEvent::DataReceived(name, data) = event {
                return Some((name, data));
            }
        }
        None
    })
    .await
    .ok()
    .flatten()
    .context("Responder never received the message")?;

    println!(
        "{} received {}",
        format!("[{}]", received.0).bold(),
        String::from_utf8_lossy(&received.1).cyan()
    );

    alice.cleanup().await;
    bob.cleanup().await;
    println!("{}", "Session closed.".green().bold());

    Ok(())
}

async fn spawn_side(
    name: &'static str,
    user_id: UserId,
    relay: &LocalRelay,
    store: &MemorySessionStore,
    signaling_config: &SignalingConfig,
    peer_config: &PeerConfig,
    events: mpsc::UnboundedSender<DemoEvent>,
) -> Result<SignalingHandle> {
    let (peer_tx, peer_rx) = mpsc::channel(256);
    let peer = WebRtcPeer::new(peer_config.clone(), peer_tx)
        .await
        .with_context(|| format!("Failed to create {} peer connection", name))?;

    let client = SignalingClient::new(
        user_id,
        signaling_config.clone(),
        Arc::new(relay.endpoint()),
        Arc::new(store.clone()),
        Arc::new(peer),
        Arc::new(DemoDelegate { name, events }),
    );

    Ok(client.spawn(peer_rx))
}

/// ICE can report `Connected` slightly before the data channel opens.
async fn send_when_open(handle: &SignalingHandle, data: Bytes) -> Result<()> {
    for _ in 0..50 {
        match handle.send_data(data.clone()).await {
            Ok(()) => return Ok(()),
            Err(SignalingError::Adapter(AdapterError::DataChannelUnavailable)) => {
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
            Err(e) => return Err(e).context("Failed to send message"),
        }
    }
    bail!("Data channel never opened")
}
