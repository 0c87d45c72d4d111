//! GossipNode and its handle.

use std::collections::HashMap;

use libp2p::{gossipsub::TopicHash, swarm::Swarm, Multiaddr, PeerId};
use tokio::sync::{mpsc, oneshot};
use tokio_util::{sync::CancellationToken, task::TaskTracker};

use crate::{network::GossipBehaviour, node::config::GossipConfig};

/// Requests from a [`GossipHandle`] to the task driving the swarm.
#[derive(Debug)]
pub(crate) enum Command {
    Subscribe {
        topic: String,
        sender: mpsc::Sender<Vec<u8>>,
        reply: oneshot::Sender<anyhow::Result<()>>,
    },
    Publish {
        topic: String,
        payload: Vec<u8>,
        reply: oneshot::Sender<anyhow::Result<()>>,
    },
    TopicPeers {
        topic: String,
        reply: oneshot::Sender<Vec<PeerId>>,
    },
    ListenAddrs {
        reply: oneshot::Sender<Vec<Multiaddr>>,
    },
    Dial {
        addr: Multiaddr,
        reply: oneshot::Sender<anyhow::Result<()>>,
    },
}

/// Swarm state owned by the driver task. Created and started with
/// [`GossipNode::spawn`].
pub struct GossipNode {
    /// The node's libp2p swarm
    pub(crate) swarm: Swarm<GossipBehaviour>,

    /// Local receivers per subscribed topic
    pub(crate) subscribers: HashMap<TopicHash, Vec<mpsc::Sender<Vec<u8>>>>,

    pub(crate) commands: mpsc::Receiver<Command>,
}

/// Cheap, cloneable access to a running gossip node. Implements
/// [`GossipTransport`](crate::transport::GossipTransport).
#[derive(Debug, Clone)]
pub struct GossipHandle {
    pub(crate) peer_id: PeerId,
    pub(crate) config: GossipConfig,
    pub(crate) commands: mpsc::Sender<Command>,
    pub(crate) shutdown_token: CancellationToken,
    pub(crate) task_tracker: TaskTracker,
}

impl GossipHandle {
    /// Get the peer ID of this node
    pub fn peer_id(&self) -> PeerId {
        self.peer_id
    }

    /// Get the configuration of this node
    pub fn config(&self) -> &GossipConfig {
        &self.config
    }

    /// Stop the swarm driver and wait for it to exit.
    pub async fn shutdown(&self) {
        tracing::info!("gossip node shutting down...");

        self.shutdown_token.cancel();
        self.task_tracker.close();
        self.task_tracker.wait().await;

        tracing::info!("gossip node shutdown");
    }

    pub fn is_running(&self) -> bool {
        !self.shutdown_token.is_cancelled() && !self.commands.is_closed()
    }
}
