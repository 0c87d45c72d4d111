//! Monitor configuration types.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{checker::DEFAULT_ALERT_CAPACITY, store::DEFAULT_WINDOW_CAP};

/// Default interval between staleness sweeps
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(15);

/// Default lifetime of metrics built with [`Monitor::metric`](crate::Monitor::metric)
pub const DEFAULT_METRIC_TTL: Duration = Duration::from_secs(30);

/// Tunables for a [`Monitor`](crate::Monitor)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Metrics retained per (peer, kind)
    pub window_cap: usize,

    /// Interval between staleness sweeps
    #[serde(with = "crate::serde_duration")]
    pub check_interval: Duration,

    /// Unread alerts held before sweeps start failing
    pub alert_capacity: usize,

    /// Lifetime given to locally built metrics
    #[serde(with = "crate::serde_duration")]
    pub default_ttl: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            window_cap: DEFAULT_WINDOW_CAP,
            check_interval: DEFAULT_CHECK_INTERVAL,
            alert_capacity: DEFAULT_ALERT_CAPACITY,
            default_ttl: DEFAULT_METRIC_TTL,
        }
    }
}

impl MonitorConfig {
    /// Create a new configuration builder
    pub fn builder() -> MonitorConfigBuilder {
        MonitorConfigBuilder::default()
    }
}

/// Builder for MonitorConfig
#[derive(Debug, Default)]
pub struct MonitorConfigBuilder {
    pub(crate) config: MonitorConfig,
}
