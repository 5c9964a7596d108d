use bytes::Bytes;
use ringside_core::{Session, UserId};
use tokio::sync::{mpsc, oneshot};

use crate::error::SignalingError;
use crate::signaling::client_command::ClientCommand;
use crate::signaling::ClientSnapshot;

/// Cloneable handle to a client running on its own task.
///
/// Once the client has cleaned up, its task ends and every call except
/// [`cleanup`](Self::cleanup) returns [`SignalingError::Closed`].
#[derive(Debug, Clone)]
pub struct SignalingHandle {
    command_tx: mpsc::Sender<ClientCommand>,
}

impl SignalingHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<ClientCommand>) -> Self {
        Self { command_tx }
    }

    pub async fn join_session(&self, session: Session) -> Result<(), SignalingError> {
        let (reply, rx) = oneshot::channel();
        self.send(ClientCommand::JoinSession { session, reply }).await?;
        rx.await.map_err(|_| SignalingError::Closed)?
    }

    pub async fn start_session(&self, peer_id: UserId) -> Result<Session, SignalingError> {
        let (reply, rx) = oneshot::channel();
        self.send(ClientCommand::StartSession { peer_id, reply }).await?;
        rx.await.map_err(|_| SignalingError::Closed)?
    }

    pub async fn send_data(&self, data: Bytes) -> Result<(), SignalingError> {
        let (reply, rx) = oneshot::channel();
        self.send(ClientCommand::SendData { data, reply }).await?;
        rx.await.map_err(|_| SignalingError::Closed)?
    }

    pub async fn snapshot(&self) -> Result<ClientSnapshot, SignalingError> {
        let (reply, rx) = oneshot::channel();
        self.send(ClientCommand::Snapshot { reply }).await?;
        rx.await.map_err(|_| SignalingError::Closed)
    }

    /// Cleans the client up and waits for it. A client that is already
    /// closed counts as cleaned up.
    pub async fn cleanup(&self) {
        let (reply, rx) = oneshot::channel();
        if self.send(ClientCommand::Cleanup { reply }).await.is_ok() {
            let _ = rx.await;
        }
    }

    /// `true` once the client task has ended.
    pub fn is_closed(&self) -> bool {
        self.command_tx.is_closed()
    }

    async fn send(&self, command: ClientCommand) -> Result<(), SignalingError> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| SignalingError::Closed)
    }
}
