//! Publish/subscribe transport used to gossip metrics.
//!
//! [`GossipTransport`] is implemented by the in-process [`MemoryHub`]
//! endpoints and by the libp2p [`GossipHandle`](crate::node::GossipHandle).

mod memory;

pub use memory::{MemoryHub, MemoryTransport};

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("receive cancelled")]
    Cancelled,
    #[error("subscription closed")]
    Closed,
    #[error("subscriber lagged, {0} messages lost")]
    Lagged(u64),
    #[error("failed to publish to topic {topic}: {reason}")]
    Publish { topic: String, reason: String },
    #[error("failed to subscribe to topic {topic}: {reason}")]
    Subscribe { topic: String, reason: String },
}

/// Topic-based publish/subscribe with opaque byte payloads.
#[async_trait]
pub trait GossipTransport: Send + Sync + 'static {
    /// Identifier other peers see as the origin of our messages.
    fn local_peer(&self) -> String;

    async fn subscribe(&self, topic: &str) -> Result<Box<dyn Subscription>, TransportError>;

    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<(), TransportError>;
}

/// Stream of payloads received on one topic.
#[async_trait]
pub trait Subscription: Send + 'static {
    /// Wait for the next payload. Returns [`TransportError::Cancelled`] as
    /// soon as `cancel` fires.
    async fn next(&mut self, cancel: &CancellationToken) -> Result<Vec<u8>, TransportError>;
}
