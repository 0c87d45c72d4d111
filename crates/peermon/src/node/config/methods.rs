//! Gossip node configuration methods.

use std::time::Duration;

use super::types::{GossipConfig, GossipConfigBuilder};

impl GossipConfig {
    /// Enable or disable mDNS discovery
    pub fn with_mdns(mut self, enable: bool) -> Self {
        self.enable_mdns = enable;
        self
    }

    /// Set bootstrap peers
    pub fn with_bootstrap_peers(mut self, peers: Vec<String>) -> Self {
        self.bootstrap_peers = peers;
        self
    }

    /// Set keypair path
    pub fn with_keypair_path(mut self, path: String) -> Self {
        self.keypair_path = Some(path);
        self
    }
}

impl GossipConfigBuilder {
    /// Build the configuration
    pub fn build(self) -> GossipConfig {
        self.config
    }

    /// Set the listen multiaddr
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set keypair path
    pub fn keypair_path(mut self, path: String) -> Self {
        self.config.keypair_path = Some(path);
        self
    }

    /// Add bootstrap peer
    pub fn bootstrap_peer(mut self, peer: String) -> Self {
        self.config.bootstrap_peers.push(peer);
        self
    }

    /// Enable mDNS
    pub fn enable_mdns(mut self) -> Self {
        self.config.enable_mdns = true;
        self
    }

    /// Disable mDNS
    pub fn disable_mdns(mut self) -> Self {
        self.config.enable_mdns = false;
        self
    }

    pub fn heartbeat_interval(mut self, interval: Duration) -> Self {
        self.config.heartbeat_interval = interval;
        self
    }
}
