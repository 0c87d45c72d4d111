//! Gossipsub event conversions.

use libp2p::gossipsub;

use crate::network::events::GossipEvent;

impl From<gossipsub::Event> for GossipEvent {
    fn from(event: gossipsub::Event) -> Self {
        match event {
            gossipsub::Event::Message { propagation_source, message, .. } => GossipEvent::Message {
                source: message.source.unwrap_or(propagation_source),
                topic: message.topic,
                data: message.data,
            },
            gossipsub::Event::Subscribed { peer_id, topic } => {
                GossipEvent::Subscribed { peer: peer_id, topic }
            }
            gossipsub::Event::Unsubscribed { peer_id, topic } => {
                GossipEvent::Unsubscribed { peer: peer_id, topic }
            }
            other => GossipEvent::Gossipsub(other),
        }
    }
}
