//! Publishing and querying through the monitor

use std::time::Duration;

use peermon::{Error, JsonCodec, Metric, MetricCodec, Monitor, MonitorConfig, PUBSUB_TOPIC};

use super::support::{init_logging, peer_set, ScriptedTransport, UnreachableResolver};

#[tokio::test]
async fn test_invalid_metrics_never_reach_the_wire() {
    init_logging();
    let (transport, _inbound) = ScriptedTransport::new("local");
    let mon = Monitor::new(transport.clone(), MonitorConfig::default()).await.unwrap();

    let no_kind = Metric::new("", "local", "1", Duration::from_secs(5));
    let no_peer = Metric::new("ping", "", "1", Duration::from_secs(5));
    let mut unmarked = Metric::new("ping", "local", "1", Duration::from_secs(5));
    unmarked.valid = false;

    for metric in [&no_kind, &no_peer, &unmarked] {
        assert!(mon.publish_metric(metric).await.is_ok());
    }
    assert!(transport.published.lock().is_empty());

    mon.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_valid_metric_is_published_on_topic() {
    let (transport, _inbound) = ScriptedTransport::new("local");
    let mon = Monitor::new(transport.clone(), MonitorConfig::default()).await.unwrap();

    let metric = mon.metric("ping", "1");
    mon.publish_metric(&metric).await.unwrap();

    let published = transport.published.lock().clone();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].0, PUBSUB_TOPIC);
    assert_eq!(JsonCodec.decode(&published[0].1).unwrap(), metric);

    mon.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_publish_failure_is_returned() {
    let (transport, _inbound) = ScriptedTransport::failing("local");
    let mon = Monitor::new(transport, MonitorConfig::default()).await.unwrap();

    let result = mon.publish_metric(&mon.metric("ping", "1")).await;
    assert!(matches!(result, Err(Error::Transport(_))));

    mon.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_local_metric_uses_defaults() {
    let (transport, _inbound) = ScriptedTransport::new("node-1");
    let config = MonitorConfig::builder().default_ttl(Duration::from_secs(120)).build();
    let mon = Monitor::new(transport, config).await.unwrap();

    let metric = mon.metric("freespace", "2048");
    assert_eq!(mon.local_peer(), "node-1");
    assert_eq!(metric.peer, "node-1");
    assert!(metric.valid);
    assert!(metric.ttl() > Duration::from_secs(110));
    assert!(metric.ttl() <= Duration::from_secs(120));

    mon.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_latest_metrics_limited_to_peer_set() {
    let (transport, _inbound) = ScriptedTransport::new("local");
    let mon = Monitor::new(transport, MonitorConfig::default()).await.unwrap();
    mon.bind_resolver(peer_set(&["peer-a", "peer-b"])).unwrap();

    let ttl = Duration::from_secs(10);
    for peer in ["peer-a", "peer-b", "peer-c"] {
        mon.log_metric(Metric::new("ping", peer, "1", ttl)).unwrap();
    }
    mon.log_metric(Metric::new("ping", "peer-b", "stale", Duration::ZERO)).unwrap();

    let latest = mon.latest_metrics("ping").await;
    let peers: Vec<_> = latest.iter().map(|m| m.peer.as_str()).collect();
    assert_eq!(peers, vec!["peer-a"]);

    mon.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_latest_metrics_empty_without_peer_set() {
    init_logging();
    let (transport, _inbound) = ScriptedTransport::new("local");
    let unbound = Monitor::new(transport, MonitorConfig::default()).await.unwrap();
    unbound.log_metric(Metric::new("ping", "peer-a", "1", Duration::from_secs(10))).unwrap();
    assert!(unbound.latest_metrics("ping").await.is_empty());
    assert!(matches!(unbound.peer_set().await, Err(Error::ResolverUnbound)));
    unbound.shutdown().await.unwrap();

    let (transport, _inbound) = ScriptedTransport::new("local");
    let unreachable = Monitor::new(transport, MonitorConfig::default()).await.unwrap();
    unreachable.bind_resolver(std::sync::Arc::new(UnreachableResolver)).unwrap();
    unreachable.log_metric(Metric::new("ping", "peer-a", "1", Duration::from_secs(10))).unwrap();
    assert!(unreachable.latest_metrics("ping").await.is_empty());
    assert!(matches!(unreachable.peer_set().await, Err(Error::PeerSet(_))));
    unreachable.shutdown().await.unwrap();
}
