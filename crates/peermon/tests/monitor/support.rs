//! Test doubles for the monitor's collaborators.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use parking_lot::Mutex;
use peermon::{GossipTransport, PeerSetResolver, Subscription, TransportError};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

pub fn init_logging() {
    let _ = logger::try_init();
}

/// Transport whose inbound payloads are fed by the test and whose
/// publications are recorded.
pub struct ScriptedTransport {
    peer: String,
    inbound: Mutex<Option<mpsc::UnboundedReceiver<Vec<u8>>>>,
    pub published: Mutex<Vec<(String, Vec<u8>)>>,
    pub fail_publish: bool,
}

impl ScriptedTransport {
    pub fn new(peer: &str) -> (Arc<Self>, mpsc::UnboundedSender<Vec<u8>>) {
        Self::build(peer, false)
    }

    pub fn failing(peer: &str) -> (Arc<Self>, mpsc::UnboundedSender<Vec<u8>>) {
        Self::build(peer, true)
    }

    fn build(peer: &str, fail_publish: bool) -> (Arc<Self>, mpsc::UnboundedSender<Vec<u8>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let transport = Self {
            peer: peer.to_string(),
            inbound: Mutex::new(Some(rx)),
            published: Mutex::new(Vec::new()),
            fail_publish,
        };
        (Arc::new(transport), tx)
    }
}

#[async_trait]
impl GossipTransport for ScriptedTransport {
    fn local_peer(&self) -> String {
        self.peer.clone()
    }

    async fn subscribe(&self, topic: &str) -> Result<Box<dyn Subscription>, TransportError> {
        let rx = self.inbound.lock().take().ok_or_else(|| TransportError::Subscribe {
            topic: topic.to_string(),
            reason: "already subscribed".to_string(),
        })?;
        Ok(Box::new(ScriptedSubscription { rx }))
    }

    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<(), TransportError> {
        if self.fail_publish {
            return Err(TransportError::Publish {
                topic: topic.to_string(),
                reason: "network down".to_string(),
            });
        }
        self.published.lock().push((topic.to_string(), payload));
        Ok(())
    }
}

struct ScriptedSubscription {
    rx: mpsc::UnboundedReceiver<Vec<u8>>,
}

#[async_trait]
impl Subscription for ScriptedSubscription {
    async fn next(&mut self, cancel: &CancellationToken) -> Result<Vec<u8>, TransportError> {
        tokio::select! {
            _ = cancel.cancelled() => Err(TransportError::Cancelled),
            payload = self.rx.recv() => payload.ok_or(TransportError::Closed),
        }
    }
}

/// Resolver that is always unreachable.
pub struct UnreachableResolver;

#[async_trait]
impl PeerSetResolver for UnreachableResolver {
    async fn peers(&self) -> anyhow::Result<Vec<String>> {
        Err(anyhow::anyhow!("consensus unreachable"))
    }
}

pub fn peer_set(names: &[&str]) -> Arc<dyn PeerSetResolver> {
    Arc::new(names.iter().map(|n| n.to_string()).collect::<Vec<_>>())
}

/// Poll `check` every 10ms until it holds or `within` elapses.
pub async fn eventually<F, Fut>(within: Duration, mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + within;
    while tokio::time::Instant::now() < deadline {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}
