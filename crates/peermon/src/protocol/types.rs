//! Wire types exchanged between peers.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current wall-clock time as unix nanoseconds.
pub(crate) fn now_nanos() -> i64 {
    Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX)
}

/// A single TTL-bounded observation reported by one peer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    /// What is being measured ("ping", "freespace", ...)
    pub kind: String,

    /// Identifier of the reporting peer
    pub peer: String,

    /// Opaque payload, interpreted by producers and consumers only
    pub value: String,

    /// False when the metric failed structural checks
    pub valid: bool,

    /// Expiry as unix nanoseconds
    pub expire: i64,
}

impl Metric {
    /// Create a metric expiring `ttl` from now. `valid` is set when both
    /// `kind` and `peer` are non-empty.
    pub fn new(
        kind: impl Into<String>,
        peer: impl Into<String>,
        value: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        let kind = kind.into();
        let peer = peer.into();
        let valid = !kind.is_empty() && !peer.is_empty();
        let mut metric = Self { kind, peer, value: value.into(), valid, expire: 0 };
        metric.set_ttl(ttl);
        metric
    }

    /// Move the expiry to `ttl` from now.
    pub fn set_ttl(&mut self, ttl: Duration) {
        let ttl = i64::try_from(ttl.as_nanos()).unwrap_or(i64::MAX);
        self.expire = now_nanos().saturating_add(ttl);
    }

    /// Remaining lifetime, zero once expired.
    pub fn ttl(&self) -> Duration {
        let left = self.expire.saturating_sub(now_nanos());
        Duration::from_nanos(u64::try_from(left).unwrap_or(0))
    }

    /// Absolute expiry time.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_nanos(self.expire)
    }

    pub fn expired(&self) -> bool {
        now_nanos() >= self.expire
    }

    /// True for metrics that must not be published: marked invalid or
    /// missing their kind or peer.
    pub fn discard(&self) -> bool {
        !self.valid || self.kind.is_empty() || self.peer.is_empty()
    }
}

/// Raised when a peer's metric of some kind has gone stale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Alert {
    pub peer: String,
    pub metric_kind: String,
}

/// Keep only the metrics reported by a member of `peers`.
pub fn peerset_filter(metrics: Vec<Metric>, peers: &[String]) -> Vec<Metric> {
    metrics.into_iter().filter(|m| peers.iter().any(|p| *p == m.peer)).collect()
}
