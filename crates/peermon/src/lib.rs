//! peermon - gossip-based peer health monitoring
//!
//! Every node gossips small TTL-bounded metrics ("ping", "freespace", ...)
//! on a shared pubsub topic, keeps a bounded history of what its peers
//! report and raises alerts when a cluster member's metric goes stale.
//! It only observes; membership and remediation belong to the owner.

pub mod checker;
pub mod error;
pub mod monitor;
pub mod network;
pub mod node;
pub mod protocol;
pub mod serde_duration;
pub mod store;
pub mod transport;

// Re-export main types
pub use checker::{Alerts, MetricsChecker};
pub use error::{Error, Result};
pub use monitor::{Monitor, MonitorConfig, PeerSetResolver};
pub use node::{GossipConfig, GossipHandle, GossipNode, TopicPeers};
pub use protocol::{Alert, JsonCodec, Metric, MetricCodec, PUBSUB_TOPIC};
pub use store::{MetricStore, Window};
pub use transport::{GossipTransport, MemoryHub, MemoryTransport, Subscription, TransportError};

/// Re-exported for [`PeerSetResolver`] implementors
pub use anyhow;
