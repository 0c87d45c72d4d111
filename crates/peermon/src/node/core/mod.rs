//! libp2p gossipsub node.
//!
//! The swarm lives in a driver task; [`GossipHandle`] talks to it through a
//! command channel.

mod gossip_node;
mod gossipsub;
mod node_methods;
mod run;

pub use gossip_node::{GossipHandle, GossipNode};
