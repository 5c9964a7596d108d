//! Pub/sub transport carrying signaling messages between the two peers.

mod local_relay;

pub use local_relay::{LocalRelay, LocalRelayEndpoint};

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;

use crate::error::TransportError;

/// Payloads published under one event on one channel, in delivery order.
pub type EventStream = BoxStream<'static, Bytes>;

/// Event name every signaling message is published under.
pub const BROADCAST_EVENT: &str = "broadcast";

/// Contract for the message relay. Implementations must not deliver a
/// payload back to the endpoint that published it.
#[async_trait]
pub trait Relay: Send + Sync {
    async fn subscribe(&self, channel_id: &str, event: &str) -> Result<EventStream, TransportError>;

    async fn publish(&self, channel_id: &str, event: &str, payload: Bytes) -> Result<(), TransportError>;

    /// Stops delivery on `channel_id` to this endpoint. Unknown channels are ignored.
    async fn unsubscribe(&self, channel_id: &str);
}
