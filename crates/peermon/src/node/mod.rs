//! Gossip node: the libp2p transport for metrics.
//!
//! This module contains configuration, identity handling and the swarm
//! driver behind [`GossipHandle`].

pub mod config;
pub mod core;
pub mod crypto;
mod resolver;

pub use config::{GossipConfig, GossipConfigBuilder, DEFAULT_LISTEN_ADDR};
pub use self::core::{GossipHandle, GossipNode};
pub use crypto::{load_keypair, load_or_generate_keypair, save_keypair};
pub use resolver::TopicPeers;
