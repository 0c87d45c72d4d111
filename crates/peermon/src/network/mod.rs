//! libp2p network behaviour and events used by the gossip node.

pub mod behaviour;
pub mod conversions;
pub mod events;

pub use behaviour::GossipBehaviour;
pub use events::GossipEvent;
