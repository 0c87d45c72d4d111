//! mDNS event conversions.

use libp2p::mdns;

use crate::network::events::GossipEvent;

impl From<mdns::Event> for GossipEvent {
    fn from(event: mdns::Event) -> Self {
        match event {
            mdns::Event::Discovered(list) => GossipEvent::PeersDiscovered(list),
            mdns::Event::Expired(list) => GossipEvent::PeersExpired(list),
        }
    }
}
