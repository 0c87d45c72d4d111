//! Gossip node configuration tests

use std::time::Duration;

use peermon::node::{GossipConfig, DEFAULT_LISTEN_ADDR};

#[test]
fn test_gossip_config_default() {
    let config = GossipConfig::default();

    assert_eq!(config.listen_addr, DEFAULT_LISTEN_ADDR);
    assert!(config.keypair_path.is_none());
    assert!(config.bootstrap_peers.is_empty());
    assert!(config.enable_mdns);
    assert_eq!(config.heartbeat_interval, Duration::from_secs(1));
}

#[test]
fn test_gossip_config_builder() {
    let config = GossipConfig::builder()
        .listen_addr("/ip4/127.0.0.1/tcp/4001")
        .bootstrap_peer("/ip4/10.0.0.2/tcp/4001".to_string())
        .keypair_path("/tmp/node.key".to_string())
        .disable_mdns()
        .heartbeat_interval(Duration::from_millis(250))
        .build();

    assert_eq!(config.listen_addr, "/ip4/127.0.0.1/tcp/4001");
    assert_eq!(config.bootstrap_peers, vec!["/ip4/10.0.0.2/tcp/4001".to_string()]);
    assert_eq!(config.keypair_path.as_deref(), Some("/tmp/node.key"));
    assert!(!config.enable_mdns);
    assert_eq!(config.heartbeat_interval, Duration::from_millis(250));
}

#[test]
fn test_gossip_config_with_methods() {
    let config = GossipConfig::default()
        .with_mdns(false)
        .with_bootstrap_peers(vec!["/dns4/seed/tcp/4001".to_string()])
        .with_keypair_path("id.key".to_string());

    assert!(!config.enable_mdns);
    assert_eq!(config.bootstrap_peers.len(), 1);
    assert_eq!(config.keypair_path.as_deref(), Some("id.key"));
}

#[test]
fn test_gossip_config_from_toml() {
    let config: GossipConfig = toml::from_str(
        r#"
        listen_addr = "/ip4/0.0.0.0/tcp/9000"
        enable_mdns = false
        heartbeat_interval = "500ms"
        "#,
    )
    .unwrap();

    assert_eq!(config.listen_addr, "/ip4/0.0.0.0/tcp/9000");
    assert!(!config.enable_mdns);
    assert_eq!(config.heartbeat_interval, Duration::from_millis(500));
    assert_eq!(config.idle_connection_timeout, Duration::from_secs(60));
}
