//! Gossip node configuration.

mod methods;
mod types;

pub use types::{GossipConfig, GossipConfigBuilder, DEFAULT_LISTEN_ADDR};
