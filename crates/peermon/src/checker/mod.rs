//! Staleness checker.
//!
//! Sweeps the [`MetricStore`] for a given peer set and raises an [`Alert`]
//! for every valid metric that has expired. Alerts go into a bounded queue;
//! a full queue fails the sweep instead of blocking it.

mod alerts;

pub use alerts::Alerts;

use std::{future::Future, sync::Arc, time::Duration};

use tokio::{
    sync::mpsc,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::{
    error::{Error, Result},
    protocol::Alert,
    store::MetricStore,
};

/// Default alert queue capacity
pub const DEFAULT_ALERT_CAPACITY: usize = 256;

#[derive(Debug)]
pub struct MetricsChecker {
    metrics: Arc<MetricStore>,
    alert_tx: mpsc::Sender<Alert>,
    alerts: Alerts,
}

impl MetricsChecker {
    /// Create a checker over `metrics` whose alert queue holds at most
    /// `capacity` unread alerts (minimum one).
    pub fn new(metrics: Arc<MetricStore>, capacity: usize) -> Self {
        let (alert_tx, alert_rx) = mpsc::channel(capacity.max(1));
        Self { metrics, alert_tx, alerts: Alerts::new(alert_rx) }
    }

    /// Raise one alert per valid, expired metric of each peer in `peers`.
    ///
    /// Stops at the first alert that does not fit in the queue and returns
    /// [`Error::AlertQueueFull`]; later peers are left for the next sweep.
    pub fn check_metrics(&self, peers: &[String]) -> Result<()> {
        for peer in peers {
            for metric in self.metrics.peer_metrics(peer) {
                if metric.valid && metric.expired() {
                    self.alert(metric.peer, metric.kind)?;
                }
            }
        }
        Ok(())
    }

    fn alert(&self, peer: String, metric_kind: String) -> Result<()> {
        debug!("raising alert for '{}' metric of '{}'", metric_kind, peer);
        // The checker holds a receiver itself, so the queue cannot close
        // while `alert_tx` is alive.
        self.alert_tx.try_send(Alert { peer, metric_kind }).map_err(|_| Error::AlertQueueFull)
    }

    /// Read side of the alert queue.
    pub fn alerts(&self) -> Alerts {
        self.alerts.clone()
    }

    /// Run [`check_metrics`](Self::check_metrics) every `interval` against
    /// the peer set returned by `peers_fn` until `token` is cancelled.
    ///
    /// A failed peer-set lookup or a full queue skips the tick.
    pub async fn watch<F, Fut>(&self, token: CancellationToken, peers_fn: F, interval: Duration)
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<Vec<String>>>,
    {
        let mut ticker = interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let peers = tokio::select! {
                biased;
                _ = token.cancelled() => break,
                peers = peers_fn() => peers,
            };

            let peers = match peers {
                Ok(peers) => peers,
                Err(e) => {
                    warn!("skipping metrics check, no peer set: {}", e);
                    continue;
                }
            };

            if let Err(e) = self.check_metrics(&peers) {
                warn!("metrics check skipped the rest of this tick: {}", e);
            }
        }
        debug!("metrics watch stopped");
    }
}
