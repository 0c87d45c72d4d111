mod config;

use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use peermon::{GossipNode, JsonCodec, Metric, Monitor, TopicPeers};
use tokio::signal;
use tracing::{info, info_span, warn};

use crate::config::Config;

/// Gossip peer health monitor node
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Config file (defaults to $XDG_CONFIG_HOME/peermon/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logger::init();

    let args = Args::parse();
    let config = Config::from_config(args.config.as_deref())?;
    info!("{}", config);

    let node = GossipNode::spawn(config.gossip.clone()).await?;
    let span = info_span!("monitor", node = %node.peer_id());
    let monitor =
        Monitor::with_span(Arc::new(node.clone()), Arc::new(JsonCodec), config.monitor.clone(), span)
            .await?;
    monitor.bind_resolver(Arc::new(TopicPeers::new(node.clone())))?;

    let alerts = monitor.alerts();
    let mut ping = tokio::time::interval(config.node.ping_interval);

    info!("peermon node started. Press Ctrl+C to exit.");
    loop {
        tokio::select! {
            _ = ping.tick() => {
                let metric =
                    Metric::new("ping", monitor.local_peer(), "alive", config.node.ping_ttl);
                if let Err(e) = monitor.publish_metric(&metric).await {
                    warn!("Failed to publish ping: {}", e);
                }
            }
            alert = alerts.recv() => match alert {
                Some(alert) => {
                    warn!("Peer {} stopped reporting '{}'", alert.peer, alert.metric_kind);
                }
                None => break,
            },
            _ = signal::ctrl_c() => {
                info!("Ctrl+C received, shutting down node.");
                break;
            }
        }
    }

    monitor.shutdown().await?;
    node.shutdown().await;
    Ok(())
}
