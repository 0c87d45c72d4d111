//! Events emitted by the gossip behaviour.

use libp2p::{gossipsub, gossipsub::TopicHash, Multiaddr, PeerId};

#[derive(Debug)]
pub enum GossipEvent {
    /// A payload arrived on a subscribed topic
    Message { source: PeerId, topic: TopicHash, data: Vec<u8> },
    /// A remote peer joined a topic
    Subscribed { peer: PeerId, topic: TopicHash },
    /// A remote peer left a topic
    Unsubscribed { peer: PeerId, topic: TopicHash },
    /// mDNS found peers on the local network
    PeersDiscovered(Vec<(PeerId, Multiaddr)>),
    /// mDNS records for these peers expired
    PeersExpired(Vec<(PeerId, Multiaddr)>),
    /// Any other gossipsub event
    Gossipsub(gossipsub::Event),
}
