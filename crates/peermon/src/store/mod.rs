//! Concurrent in-memory metric store.
//!
//! Metrics are grouped by reporting peer, then by kind. Each group keeps a
//! bounded [`Window`] of history. Readers always receive copies.

mod window;

pub use window::Window;

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::protocol::Metric;

/// Default number of metrics retained per (peer, kind)
pub const DEFAULT_WINDOW_CAP: usize = 25;

type PeerWindows = HashMap<String, Window>;

#[derive(Debug)]
pub struct MetricStore {
    window_cap: usize,
    by_peer: RwLock<HashMap<String, PeerWindows>>,
}

impl Default for MetricStore {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_CAP)
    }
}

impl MetricStore {
    pub fn new(window_cap: usize) -> Self {
        Self { window_cap, by_peer: RwLock::new(HashMap::new()) }
    }

    /// Record `metric` under its peer and kind. The metric is stored as
    /// given; validation happens before it gets here.
    pub fn add(&self, metric: Metric) {
        let mut by_peer = self.by_peer.write();
        by_peer
            .entry(metric.peer.clone())
            .or_default()
            .entry(metric.kind.clone())
            .or_insert_with(|| Window::new(self.window_cap))
            .add(metric);
    }

    /// The newest `kind` metric of every peer, skipping peers whose newest
    /// report has expired.
    pub fn latest(&self, kind: &str) -> Vec<Metric> {
        let by_peer = self.by_peer.read();
        by_peer
            .values()
            .filter_map(|kinds| kinds.get(kind)?.latest())
            .filter(|metric| !metric.expired())
            .cloned()
            .collect()
    }

    /// The newest metric of each kind reported by `peer`, expired or not.
    pub fn peer_metrics(&self, peer: &str) -> Vec<Metric> {
        let by_peer = self.by_peer.read();
        by_peer
            .get(peer)
            .map(|kinds| kinds.values().filter_map(Window::latest).cloned().collect())
            .unwrap_or_default()
    }

    /// Full retained history for one (peer, kind), oldest first.
    pub fn history(&self, peer: &str, kind: &str) -> Vec<Metric> {
        let by_peer = self.by_peer.read();
        by_peer
            .get(peer)
            .and_then(|kinds| kinds.get(kind))
            .map(Window::all)
            .unwrap_or_default()
    }

    /// Every peer that has reported at least once.
    pub fn peers(&self) -> Vec<String> {
        self.by_peer.read().keys().cloned().collect()
    }

    pub fn window_cap(&self) -> usize {
        self.window_cap
    }
}
