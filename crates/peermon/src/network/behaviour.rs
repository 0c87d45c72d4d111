//! Network behaviour for gossiping metrics.

use std::{
    hash::{Hash, Hasher},
    time::Duration,
};

use anyhow::Result;
use libp2p::{
    gossipsub,
    identity::Keypair,
    mdns,
    swarm::{behaviour::toggle::Toggle, NetworkBehaviour},
    PeerId,
};

use super::events::GossipEvent;
use crate::node::GossipConfig;

#[derive(NetworkBehaviour)]
#[behaviour(to_swarm = "GossipEvent")]
pub struct GossipBehaviour {
    /// Gossipsub for metric broadcasting
    pub gossipsub: gossipsub::Behaviour,
    /// mDNS for local peer discovery
    pub mdns: Toggle<mdns::tokio::Behaviour>,
}

impl GossipBehaviour {
    pub fn new(keypair: &Keypair, config: &GossipConfig) -> Result<Self> {
        let local_peer_id = PeerId::from(keypair.public());

        let gossipsub = Self::create_gossipsub(keypair, config.heartbeat_interval)?;

        // mDNS is optional; some platforms and containers cannot bind it
        let mdns = if config.enable_mdns {
            match mdns::tokio::Behaviour::new(mdns::Config::default(), local_peer_id) {
                Ok(behaviour) => {
                    tracing::info!("mDNS local peer discovery enabled");
                    Some(behaviour)
                }
                Err(e) => {
                    tracing::warn!("Failed to enable mDNS: {}", e);
                    tracing::info!("Peer discovery will rely on configured bootstrap peers");
                    None
                }
            }
        } else {
            tracing::info!("mDNS disabled by configuration");
            None
        };

        Ok(Self { gossipsub, mdns: mdns.into() })
    }

    fn create_gossipsub(keypair: &Keypair, heartbeat: Duration) -> Result<gossipsub::Behaviour> {
        let gossipsub_config = gossipsub::ConfigBuilder::default()
            .heartbeat_interval(heartbeat)
            .validation_mode(gossipsub::ValidationMode::Strict)
            .message_id_fn(|msg| {
                // Identical payloads share an id, so re-sent metrics dedupe
                let mut hasher = std::collections::hash_map::DefaultHasher::new();
                msg.data.hash(&mut hasher);
                msg.source.hash(&mut hasher);
                gossipsub::MessageId::from(hasher.finish().to_string())
            })
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create gossipsub config: {}", e))?;

        gossipsub::Behaviour::new(
            gossipsub::MessageAuthenticity::Signed(keypair.clone()),
            gossipsub_config,
        )
        .map_err(|e| anyhow::anyhow!("Failed to create gossipsub behaviour: {}", e))
    }
}
