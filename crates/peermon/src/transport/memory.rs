//! In-process transport: every endpoint joined to a hub sees what the
//! others publish.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::{GossipTransport, Subscription, TransportError};

const DEFAULT_TOPIC_BUFFER: usize = 1024;

#[derive(Debug, Clone)]
struct Envelope {
    origin: String,
    payload: Vec<u8>,
}

/// Shared message bus. Clones refer to the same bus.
#[derive(Debug, Clone)]
pub struct MemoryHub {
    topics: Arc<Mutex<HashMap<String, broadcast::Sender<Envelope>>>>,
    buffer: usize,
}

impl Default for MemoryHub {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHub {
    pub fn new() -> Self {
        Self::with_buffer(DEFAULT_TOPIC_BUFFER)
    }

    /// A hub whose topics retain at most `buffer` undelivered messages per
    /// subscriber.
    pub fn with_buffer(buffer: usize) -> Self {
        Self { topics: Arc::new(Mutex::new(HashMap::new())), buffer: buffer.max(1) }
    }

    /// Attach an endpoint publishing as `peer`.
    pub fn join(&self, peer: impl Into<String>) -> MemoryTransport {
        MemoryTransport { peer: peer.into(), hub: self.clone() }
    }

    fn topic(&self, topic: &str) -> broadcast::Sender<Envelope> {
        self.topics
            .lock()
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(self.buffer).0)
            .clone()
    }
}

/// One peer's endpoint on a [`MemoryHub`]. Own publications are not
/// delivered back to it.
#[derive(Debug, Clone)]
pub struct MemoryTransport {
    peer: String,
    hub: MemoryHub,
}

#[async_trait]
impl GossipTransport for MemoryTransport {
    fn local_peer(&self) -> String {
        self.peer.clone()
    }

    async fn subscribe(&self, topic: &str) -> Result<Box<dyn Subscription>, TransportError> {
        let rx = self.hub.topic(topic).subscribe();
        Ok(Box::new(MemorySubscription { peer: self.peer.clone(), rx }))
    }

    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<(), TransportError> {
        let envelope = Envelope { origin: self.peer.clone(), payload };
        // No receivers is not an error; gossip with nobody listening.
        if self.hub.topic(topic).send(envelope).is_err() {
            debug!("no subscribers on topic {}", topic);
        }
        Ok(())
    }
}

struct MemorySubscription {
    peer: String,
    rx: broadcast::Receiver<Envelope>,
}

#[async_trait]
impl Subscription for MemorySubscription {
    async fn next(&mut self, cancel: &CancellationToken) -> Result<Vec<u8>, TransportError> {
        loop {
            let received = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(TransportError::Cancelled),
                received = self.rx.recv() => received,
            };

            match received {
                Ok(envelope) if envelope.origin == self.peer => continue,
                Ok(envelope) => return Ok(envelope.payload),
                Err(RecvError::Lagged(lost)) => return Err(TransportError::Lagged(lost)),
                Err(RecvError::Closed) => return Err(TransportError::Closed),
            }
        }
    }
}
