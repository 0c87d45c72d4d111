//! Construction of gossip nodes.

use std::collections::HashMap;

use anyhow::Result;
use libp2p::{noise, tcp, yamux, Multiaddr, PeerId};
use tokio::sync::mpsc;
use tokio_util::{sync::CancellationToken, task::TaskTracker};
use tracing::{info, warn, Instrument};

use super::gossip_node::{GossipHandle, GossipNode};
use crate::{
    network::GossipBehaviour,
    node::{config::GossipConfig, crypto::load_or_generate_keypair},
};

const COMMAND_BUFFER: usize = 64;

impl GossipNode {
    /// Build a swarm from `config`, start listening and spawn the driver.
    pub async fn spawn(config: GossipConfig) -> Result<GossipHandle> {
        let keypair = match &config.keypair_path {
            Some(path) => load_or_generate_keypair(path)?,
            None => libp2p::identity::Keypair::generate_ed25519(),
        };

        let peer_id = PeerId::from(keypair.public());
        info!("Local peer id: {}", peer_id);

        let behaviour = GossipBehaviour::new(&keypair, &config)?;
        let idle_timeout = config.idle_connection_timeout;

        let mut swarm = libp2p::SwarmBuilder::with_existing_identity(keypair)
            .with_tokio()
            .with_tcp(
                tcp::Config::default().nodelay(true),
                noise::Config::new,
                yamux::Config::default,
            )?
            .with_behaviour(|_| behaviour)?
            .with_swarm_config(|c| c.with_idle_connection_timeout(idle_timeout))
            .build();

        let listen_addr: Multiaddr = config.listen_addr.parse()?;
        swarm.listen_on(listen_addr)?;

        for peer in &config.bootstrap_peers {
            match peer.parse::<Multiaddr>() {
                Ok(addr) => {
                    if let Err(e) = swarm.dial(addr.clone()) {
                        warn!("Failed to dial bootstrap peer {}: {}", addr, e);
                    }
                }
                Err(e) => warn!("Ignoring invalid bootstrap address {}: {}", peer, e),
            }
        }

        let (commands_tx, commands_rx) = mpsc::channel(COMMAND_BUFFER);
        let node = GossipNode { swarm, subscribers: HashMap::new(), commands: commands_rx };

        let shutdown_token = CancellationToken::new();
        let task_tracker = TaskTracker::new();
        task_tracker.spawn(
            node.run(shutdown_token.clone())
                .instrument(tracing::info_span!("gossip", peer = %peer_id)),
        );

        Ok(GossipHandle { peer_id, config, commands: commands_tx, shutdown_token, task_tracker })
    }
}
