//! Swarm driver loop.

use futures::StreamExt;
use libp2p::swarm::SwarmEvent;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::gossip_node::GossipNode;
use crate::network::GossipEvent;

impl GossipNode {
    /// Poll the swarm and serve handle commands until `token` is cancelled
    /// or every handle is dropped.
    pub(crate) async fn run(mut self, token: CancellationToken) {
        info!("gossip node event loop started");
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                command = self.commands.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => break,
                },
                event = self.swarm.select_next_some() => self.handle_swarm_event(event),
            }
        }
        info!("gossip node event loop stopped");
    }

    fn handle_swarm_event(&mut self, event: SwarmEvent<GossipEvent>) {
        match event {
            SwarmEvent::Behaviour(event) => self.handle_gossip_event(event),
            SwarmEvent::NewListenAddr { address, .. } => {
                info!("Listening on {}", address);
            }
            SwarmEvent::ConnectionEstablished { peer_id, endpoint, .. } => {
                debug!("Connection established with {} via {}", peer_id, endpoint.get_remote_address());
            }
            SwarmEvent::ConnectionClosed { peer_id, cause, .. } => {
                debug!("Connection closed with {} (cause: {:?})", peer_id, cause);
            }
            SwarmEvent::OutgoingConnectionError { peer_id, error, .. } => {
                if let Some(peer_id) = peer_id {
                    warn!("Outgoing connection error to {}: {}", peer_id, error);
                } else {
                    warn!("Outgoing connection error: {}", error);
                }
            }
            SwarmEvent::IncomingConnectionError { send_back_addr, error, .. } => {
                warn!("Incoming connection error from {}: {}", send_back_addr, error);
            }
            _ => {}
        }
    }

    fn handle_gossip_event(&mut self, event: GossipEvent) {
        match event {
            GossipEvent::Message { source, topic, data } => {
                debug!("Received {} bytes on {} from {}", data.len(), topic, source);
                self.deliver(&topic, data);
            }
            GossipEvent::Subscribed { peer, topic } => {
                debug!("{} subscribed to {}", peer, topic);
            }
            GossipEvent::Unsubscribed { peer, topic } => {
                debug!("{} unsubscribed from {}", peer, topic);
            }
            GossipEvent::PeersDiscovered(list) => {
                for (peer_id, addr) in list {
                    info!("Discovered peer {} at {}", peer_id, addr);
                    self.swarm.behaviour_mut().gossipsub.add_explicit_peer(&peer_id);
                    if let Err(e) = self.swarm.dial(addr) {
                        debug!("Not dialing discovered peer {}: {}", peer_id, e);
                    }
                }
            }
            GossipEvent::PeersExpired(list) => {
                for (peer_id, _) in list {
                    info!("Peer expired: {}", peer_id);
                    self.swarm.behaviour_mut().gossipsub.remove_explicit_peer(&peer_id);
                }
            }
            GossipEvent::Gossipsub(event) => {
                debug!("Gossipsub event: {:?}", event);
            }
        }
    }
}
