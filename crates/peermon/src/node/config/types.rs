//! Gossip node configuration types.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Listen on every interface, OS-assigned port
pub const DEFAULT_LISTEN_ADDR: &str = "/ip4/0.0.0.0/tcp/0";

/// Configuration options for a gossip node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GossipConfig {
    /// Multiaddr to listen on
    pub listen_addr: String,

    /// Path to keypair file (will be generated if it doesn't exist)
    pub keypair_path: Option<String>,

    /// Multiaddrs dialed at startup
    pub bootstrap_peers: Vec<String>,

    /// Whether to enable mDNS discovery
    pub enable_mdns: bool,

    /// Gossipsub heartbeat
    #[serde(with = "crate::serde_duration")]
    pub heartbeat_interval: Duration,

    /// Close connections idle for this long
    #[serde(with = "crate::serde_duration")]
    pub idle_connection_timeout: Duration,
}

impl Default for GossipConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            keypair_path: None,
            bootstrap_peers: Vec::new(),
            enable_mdns: true,
            heartbeat_interval: Duration::from_secs(1),
            idle_connection_timeout: Duration::from_secs(60),
        }
    }
}

impl GossipConfig {
    /// Create a new configuration builder
    pub fn builder() -> GossipConfigBuilder {
        GossipConfigBuilder::default()
    }
}

/// Builder for GossipConfig
#[derive(Debug, Default)]
pub struct GossipConfigBuilder {
    pub(crate) config: GossipConfig,
}
