//! Conversions from libp2p behaviour events to [`GossipEvent`](super::GossipEvent).

pub mod gossipsub;
pub mod mdns;
