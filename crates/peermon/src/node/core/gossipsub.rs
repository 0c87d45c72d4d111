//! Topic operations of the gossip node and its [`GossipTransport`] impl.

use async_trait::async_trait;
use libp2p::{
    gossipsub::{IdentTopic, TopicHash},
    Multiaddr, PeerId,
};
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::gossip_node::{Command, GossipHandle, GossipNode};
use crate::transport::{GossipTransport, Subscription, TransportError};

/// Payloads buffered per local subscriber before new ones are dropped
const SUBSCRIBER_BUFFER: usize = 256;

impl GossipNode {
    pub(crate) fn handle_command(&mut self, command: Command) {
        match command {
            Command::Subscribe { topic, sender, reply } => {
                let result = self.subscribe_to_topic(&topic).map(|hash| {
                    self.subscribers.entry(hash).or_default().push(sender);
                });
                let _ = reply.send(result);
            }
            Command::Publish { topic, payload, reply } => {
                let _ = reply.send(self.publish_to_topic(&topic, payload));
            }
            Command::TopicPeers { topic, reply } => {
                let _ = reply.send(self.topic_peers(&topic));
            }
            Command::ListenAddrs { reply } => {
                let _ = reply.send(self.swarm.listeners().cloned().collect());
            }
            Command::Dial { addr, reply } => {
                let result = self
                    .swarm
                    .dial(addr.clone())
                    .map_err(|e| anyhow::anyhow!("Failed to dial {}: {}", addr, e));
                let _ = reply.send(result);
            }
        }
    }

    /// Subscribe to a specific GossipSub topic
    fn subscribe_to_topic(&mut self, topic_name: &str) -> anyhow::Result<TopicHash> {
        let topic = IdentTopic::new(topic_name);
        self.swarm
            .behaviour_mut()
            .gossipsub
            .subscribe(&topic)
            .map_err(|e| anyhow::anyhow!("Failed to subscribe to topic {}: {}", topic_name, e))?;
        debug!("Subscribed to topic {}", topic_name);
        Ok(topic.hash())
    }

    /// Publish a message to a specific GossipSub topic
    fn publish_to_topic(&mut self, topic_name: &str, message: Vec<u8>) -> anyhow::Result<()> {
        let topic = IdentTopic::new(topic_name);

        match self.swarm.behaviour_mut().gossipsub.publish(topic, message) {
            Ok(_) => {
                debug!("Published message to topic {}", topic_name);
                Ok(())
            }
            Err(e) => {
                // Not every libp2p version has a typed variant for this; match on the message.
                let msg = e.to_string();
                if msg.contains("InsufficientPeers")
                    || msg.contains("NoPeersSubscribedToTopic")
                    || msg.to_lowercase().contains("no peers")
                {
                    debug!("No peers on topic {} to receive the message", topic_name);
                    Ok(())
                } else {
                    Err(anyhow::anyhow!("Failed to publish to topic {}: {}", topic_name, e))
                }
            }
        }
    }

    /// Peers we know to be subscribed to `topic`
    fn topic_peers(&self, topic: &str) -> Vec<PeerId> {
        let hash = IdentTopic::new(topic).hash();
        self.swarm
            .behaviour()
            .gossipsub
            .all_peers()
            .filter(|(_, topics)| topics.contains(&&hash))
            .map(|(peer, _)| *peer)
            .collect()
    }

    /// Hand a received payload to every local subscriber of `topic`.
    pub(crate) fn deliver(&mut self, topic: &TopicHash, data: Vec<u8>) {
        let Some(senders) = self.subscribers.get_mut(topic) else {
            return;
        };
        senders.retain(|sender| match sender.try_send(data.clone()) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("Subscriber on {} is full, dropping message", topic);
                true
            }
            Err(mpsc::error::TrySendError::Closed(_)) => false,
        });
    }
}

impl GossipHandle {
    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> anyhow::Result<T> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(build(reply))
            .await
            .map_err(|_| anyhow::anyhow!("gossip node is not running"))?;
        response.await.map_err(|_| anyhow::anyhow!("gossip node stopped before replying"))
    }

    /// Remote peers currently known to be subscribed to `topic`.
    pub async fn topic_peers(&self, topic: &str) -> anyhow::Result<Vec<PeerId>> {
        let topic = topic.to_string();
        self.request(|reply| Command::TopicPeers { topic, reply }).await
    }

    /// Addresses the node is listening on.
    pub async fn listen_addrs(&self) -> anyhow::Result<Vec<Multiaddr>> {
        self.request(|reply| Command::ListenAddrs { reply }).await
    }

    pub async fn dial(&self, addr: Multiaddr) -> anyhow::Result<()> {
        self.request(|reply| Command::Dial { addr, reply }).await?
    }
}

#[async_trait]
impl GossipTransport for GossipHandle {
    fn local_peer(&self) -> String {
        self.peer_id.to_string()
    }

    async fn subscribe(&self, topic: &str) -> Result<Box<dyn Subscription>, TransportError> {
        let (sender, rx) = mpsc::channel(SUBSCRIBER_BUFFER);
        let name = topic.to_string();
        self.request(|reply| Command::Subscribe { topic: name, sender, reply })
            .await
            .and_then(|result| result)
            .map_err(|e| TransportError::Subscribe { topic: topic.to_string(), reason: e.to_string() })?;
        Ok(Box::new(GossipSubscription { rx }))
    }

    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<(), TransportError> {
        let name = topic.to_string();
        self.request(|reply| Command::Publish { topic: name, payload, reply })
            .await
            .and_then(|result| result)
            .map_err(|e| TransportError::Publish { topic: topic.to_string(), reason: e.to_string() })
    }
}

struct GossipSubscription {
    rx: mpsc::Receiver<Vec<u8>>,
}

#[async_trait]
impl Subscription for GossipSubscription {
    async fn next(&mut self, cancel: &CancellationToken) -> Result<Vec<u8>, TransportError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(TransportError::Cancelled),
            payload = self.rx.recv() => payload.ok_or(TransportError::Closed),
        }
    }
}
