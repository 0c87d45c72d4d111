//! Peer set derived from the gossip mesh.

use async_trait::async_trait;

use super::core::GossipHandle;
use crate::{monitor::PeerSetResolver, protocol::PUBSUB_TOPIC, transport::GossipTransport};

/// Treats this node plus every peer subscribed to the metrics topic as the
/// cluster.
#[derive(Debug, Clone)]
pub struct TopicPeers {
    node: GossipHandle,
}

impl TopicPeers {
    pub fn new(node: GossipHandle) -> Self {
        Self { node }
    }
}

#[async_trait]
impl PeerSetResolver for TopicPeers {
    async fn peers(&self) -> anyhow::Result<Vec<String>> {
        let mut peers: Vec<String> =
            self.node.topic_peers(PUBSUB_TOPIC).await?.iter().map(ToString::to_string).collect();
        peers.push(self.node.local_peer());
        Ok(peers)
    }
}
