//! Peer monitor: gossips metrics, stores what peers report and raises
//! alerts when a member's metric goes stale.
//!
//! ## Lifecycle
//!
//! A new [`Monitor`] is subscribed to [`PUBSUB_TOPIC`] but idle. Binding a
//! [`PeerSetResolver`] with [`Monitor::bind_resolver`] starts two
//! background tasks: the pubsub receive loop and the checker's watch loop.
//! [`Monitor::shutdown`] cancels both and waits for them to exit. If it runs
//! before a resolver is bound, the background tasks never start.

mod config;
mod peers;

pub use config::{MonitorConfig, MonitorConfigBuilder, DEFAULT_CHECK_INTERVAL, DEFAULT_METRIC_TTL};
pub use peers::PeerSetResolver;

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{oneshot, Mutex as AsyncMutex};
use tokio_util::{sync::CancellationToken, task::TaskTracker};
use tracing::{debug, error, info, info_span, warn, Instrument, Span};

use self::peers::RemotePeers;
use crate::{
    checker::{Alerts, MetricsChecker},
    error::{Error, Result},
    protocol::{peerset_filter, JsonCodec, Metric, MetricCodec, PUBSUB_TOPIC},
    store::MetricStore,
    transport::{GossipTransport, Subscription, TransportError},
};

pub struct Monitor {
    local_peer: String,
    config: MonitorConfig,
    transport: Arc<dyn GossipTransport>,
    codec: Arc<dyn MetricCodec>,
    metrics: Arc<MetricStore>,
    checker: Arc<MetricsChecker>,
    peers: RemotePeers,
    resolver_ready: Mutex<Option<oneshot::Sender<()>>>,
    shutdown_token: CancellationToken,
    task_tracker: TaskTracker,
    shutdown: AsyncMutex<bool>,
    span: Span,
}

impl Monitor {
    /// Create a monitor exchanging JSON-encoded metrics over `transport`.
    pub async fn new(transport: Arc<dyn GossipTransport>, config: MonitorConfig) -> Result<Self> {
        Self::with_codec(transport, Arc::new(JsonCodec), config).await
    }

    pub async fn with_codec(
        transport: Arc<dyn GossipTransport>,
        codec: Arc<dyn MetricCodec>,
        config: MonitorConfig,
    ) -> Result<Self> {
        let span = info_span!("monitor", peer = %transport.local_peer());
        Self::with_span(transport, codec, config, span).await
    }

    /// Full constructor; every log line of this monitor and its background
    /// tasks is recorded inside `span`.
    pub async fn with_span(
        transport: Arc<dyn GossipTransport>,
        codec: Arc<dyn MetricCodec>,
        config: MonitorConfig,
        span: Span,
    ) -> Result<Self> {
        config.validate()?;

        let subscription = transport.subscribe(PUBSUB_TOPIC).instrument(span.clone()).await?;

        let metrics = Arc::new(MetricStore::new(config.window_cap));
        let checker = Arc::new(MetricsChecker::new(metrics.clone(), config.alert_capacity));
        let (ready_tx, ready_rx) = oneshot::channel();

        let mon = Self {
            local_peer: transport.local_peer(),
            config,
            transport,
            codec,
            metrics,
            checker,
            peers: RemotePeers::default(),
            resolver_ready: Mutex::new(Some(ready_tx)),
            shutdown_token: CancellationToken::new(),
            task_tracker: TaskTracker::new(),
            shutdown: AsyncMutex::new(false),
            span,
        };

        mon.run(ready_rx, subscription);
        Ok(mon)
    }

    /// Wait for a resolver, then start the receive and watch loops.
    fn run(&self, ready_rx: oneshot::Receiver<()>, subscription: Box<dyn Subscription>) {
        let token = self.shutdown_token.clone();
        let tracker = self.task_tracker.clone();
        let codec = self.codec.clone();
        let metrics = self.metrics.clone();
        let checker = self.checker.clone();
        let peers = self.peers.clone();
        let interval = self.config.check_interval;
        let span = self.span.clone();

        self.task_tracker.spawn(
            async move {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        debug!("monitor stopped before a peer set resolver was bound");
                    }
                    ready = ready_rx => {
                        if ready.is_err() {
                            return;
                        }
                        info!("peer set resolver bound, starting monitor tasks");

                        let receive_token = token.clone();
                        let watch_token = token.clone();
                        tracker.spawn(
                            log_from_pubsub(subscription, codec, metrics, receive_token)
                                .instrument(span.clone()),
                        );
                        tracker.spawn(
                            async move {
                                let peers_fn = move || {
                                    let peers = peers.clone();
                                    async move { peers.get_peer_set().await }
                                };
                                checker.watch(watch_token, peers_fn, interval).await
                            }
                            .instrument(span),
                        );
                    }
                }
            }
            .instrument(self.span.clone()),
        );
    }

    /// Hand over the peer-set resolver and start the background tasks.
    ///
    /// Can only happen once, and not after [`shutdown`](Self::shutdown).
    pub fn bind_resolver(&self, resolver: Arc<dyn PeerSetResolver>) -> Result<()> {
        if self.shutdown_token.is_cancelled() {
            return Err(Error::ShutDown);
        }
        // shutdown() cancels before taking the slot, so an empty slot after
        // cancellation means the monitor stopped, not a second binding.
        let ready_tx = self.resolver_ready.lock().take().ok_or_else(|| {
            if self.shutdown_token.is_cancelled() {
                Error::ShutDown
            } else {
                Error::ResolverAlreadyBound
            }
        })?;
        self.peers.bind(resolver)?;
        ready_tx.send(()).map_err(|_| Error::ShutDown)
    }

    pub fn is_armed(&self) -> bool {
        self.peers.is_bound()
    }

    /// Stop the monitor: no alerts are delivered and no metrics stored by
    /// background tasks once this returns. Calling it again is a no-op.
    pub async fn shutdown(&self) -> Result<()> {
        let mut shutdown = self.shutdown.lock().await;
        if *shutdown {
            self.span.in_scope(|| warn!("monitor already shut down"));
            return Ok(());
        }

        self.span.in_scope(|| info!("stopping monitor"));
        self.shutdown_token.cancel();
        self.resolver_ready.lock().take();
        self.task_tracker.close();
        self.task_tracker.wait().await;

        *shutdown = true;
        self.span.in_scope(|| info!("monitor stopped"));
        Ok(())
    }

    /// Store a metric so it can later be retrieved.
    pub fn log_metric(&self, metric: Metric) -> Result<()> {
        self.span.in_scope(|| record_metric(&self.metrics, metric));
        Ok(())
    }

    /// Broadcast `metric` to the cluster. Invalid metrics are dropped with a
    /// warning and never reach the transport.
    pub async fn publish_metric(&self, metric: &Metric) -> Result<()> {
        async {
            if metric.discard() {
                warn!("discarding invalid metric: {:?}", metric);
                return Ok(());
            }

            let payload = self.codec.encode(metric).inspect_err(|e| error!("{}", e))?;

            debug!(
                "publishing metric '{}' to pubsub. Expires: {}",
                metric.kind,
                metric.expires_at()
            );

            self.transport
                .publish(PUBSUB_TOPIC, payload)
                .await
                .inspect_err(|e| error!("{}", e))?;
            Ok::<(), Error>(())
        }
        .instrument(self.span.clone())
        .await
    }

    /// Current cluster members according to the bound resolver.
    pub async fn peer_set(&self) -> Result<Vec<String>> {
        self.peers.get_peer_set().instrument(self.span.clone()).await
    }

    /// Latest unexpired metrics of `kind` reported by current cluster
    /// members. Empty when the peer set cannot be resolved.
    pub async fn latest_metrics(&self, kind: &str) -> Vec<Metric> {
        let latest = self.metrics.latest(kind);

        match self.peer_set().await {
            Ok(peers) => peerset_filter(latest, &peers),
            Err(_) => Vec::new(),
        }
    }

    /// Alerts raised for stale peer metrics.
    pub fn alerts(&self) -> Alerts {
        self.checker.alerts()
    }

    /// Build a local metric with the configured default TTL.
    pub fn metric(&self, kind: impl Into<String>, value: impl Into<String>) -> Metric {
        Metric::new(kind, self.local_peer.clone(), value, self.config.default_ttl)
    }

    pub fn local_peer(&self) -> &str {
        &self.local_peer
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn metrics(&self) -> &MetricStore {
        &self.metrics
    }

    /// Span every log line of this monitor is recorded in.
    pub fn span(&self) -> &Span {
        &self.span
    }
}

impl Drop for Monitor {
    fn drop(&mut self) {
        self.shutdown_token.cancel();
    }
}

fn record_metric(metrics: &MetricStore, metric: Metric) {
    debug!(
        "logged '{}' metric from '{}'. Expires on {}",
        metric.kind,
        metric.peer,
        metric.expires_at()
    );
    metrics.add(metric);
}

/// Feed every decodable payload on the subscription into the store.
async fn log_from_pubsub(
    mut subscription: Box<dyn Subscription>,
    codec: Arc<dyn MetricCodec>,
    metrics: Arc<MetricStore>,
    token: CancellationToken,
) {
    debug!("receiving metrics from pubsub");
    loop {
        let payload = match subscription.next(&token).await {
            Ok(payload) => payload,
            Err(TransportError::Cancelled) => break,
            Err(TransportError::Lagged(lost)) => {
                warn!("pubsub receiver lagged, {} metrics lost", lost);
                continue;
            }
            Err(TransportError::Closed) => {
                warn!("pubsub subscription closed");
                break;
            }
            Err(e) => {
                error!("{}", e);
                continue;
            }
        };

        let metric = match codec.decode(&payload) {
            Ok(metric) => metric,
            Err(e) => {
                error!("{}", e);
                continue;
            }
        };
        debug!("received pubsub metric '{}' from '{}'", metric.kind, metric.peer);

        record_metric(&metrics, metric);
    }
    debug!("pubsub receive loop stopped");
}
