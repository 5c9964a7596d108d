use bytes::Bytes;
use ringside_core::{Session, UserId};
use tokio::sync::oneshot;

use crate::error::SignalingError;
use crate::signaling::ClientSnapshot;

pub type Reply<T> = oneshot::Sender<Result<T, SignalingError>>;

/// Requests a [`SignalingHandle`](crate::signaling::SignalingHandle) sends to the client task.
#[derive(Debug)]
pub enum ClientCommand {
    JoinSession { session: Session, reply: Reply<()> },
    StartSession { peer_id: UserId, reply: Reply<Session> },
    SendData { data: Bytes, reply: Reply<()> },
    Snapshot { reply: oneshot::Sender<ClientSnapshot> },
    Cleanup { reply: oneshot::Sender<()> },
}
