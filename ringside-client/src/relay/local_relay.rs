use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use futures::StreamExt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::TransportError;
use crate::relay::{EventStream, Relay};

struct Subscriber {
    endpoint: u64,
    event: String,
    tx: mpsc::UnboundedSender<Bytes>,
}

struct LocalRelayInner {
    channels: DashMap<String, Vec<Subscriber>>,
    next_endpoint: AtomicU64,
}

/// In-process relay hub. Each [`LocalRelayEndpoint`] plays the part of one
/// connected client.
#[derive(Clone)]
pub struct LocalRelay {
    inner: Arc<LocalRelayInner>,
}

impl Default for LocalRelay {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalRelay {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(LocalRelayInner {
                channels: DashMap::new(),
                next_endpoint: AtomicU64::new(1),
            }),
        }
    }

    pub fn endpoint(&self) -> LocalRelayEndpoint {
        LocalRelayEndpoint {
            id: self.inner.next_endpoint.fetch_add(1, Ordering::Relaxed),
            inner: self.inner.clone(),
        }
    }

    pub fn subscriber_count(&self, channel_id: &str) -> usize {
        self.inner
            .channels
            .get(channel_id)
            .map_or(0, |subscribers| subscribers.len())
    }
}

#[derive(Clone)]
pub struct LocalRelayEndpoint {
    id: u64,
    inner: Arc<LocalRelayInner>,
}

impl LocalRelayEndpoint {
    pub fn id(&self) -> u64 {
        self.id
    }
}

#[async_trait]
impl Relay for LocalRelayEndpoint {
    async fn subscribe(&self, channel_id: &str, event: &str) -> Result<EventStream, TransportError> {
        let (tx, mut rx) = mpsc::unbounded_channel();

        self.inner
            .channels
            .entry(channel_id.to_owned())
            .or_default()
            .push(Subscriber {
                endpoint: self.id,
                event: event.to_owned(),
                tx,
            });
        debug!("Endpoint {} subscribed to {}/{}", self.id, channel_id, event);

        Ok(futures::stream::poll_fn(move |cx| rx.poll_recv(cx)).boxed())
    }

    async fn publish(&self, channel_id: &str, event: &str, payload: Bytes) -> Result<(), TransportError> {
        let Some(mut subscribers) = self.inner.channels.get_mut(channel_id) else {
            debug!("Publish on {} with no subscribers", channel_id);
            return Ok(());
        };

        subscribers.retain(|subscriber| {
            if subscriber.endpoint == self.id || subscriber.event != event {
                return true;
            }
            if subscriber.tx.send(payload.clone()).is_err() {
                warn!(
                    "Dropping closed subscriber {} on {}",
                    subscriber.endpoint, channel_id
                );
                return false;
            }
            true
        });

        Ok(())
    }

    async fn unsubscribe(&self, channel_id: &str) {
        let emptied = match self.inner.channels.get_mut(channel_id) {
            Some(mut subscribers) => {
                subscribers.retain(|subscriber| subscriber.endpoint != self.id);
                subscribers.is_empty()
            }
            None => false,
        };

        if emptied {
            self.inner
                .channels
                .remove_if(channel_id, |_, subscribers| subscribers.is_empty());
        }
        debug!("Endpoint {} unsubscribed from {}", self.id, channel_id);
    }
}
