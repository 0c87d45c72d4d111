//! Monitor configuration.

mod methods;
mod types;

pub use types::{MonitorConfig, MonitorConfigBuilder, DEFAULT_CHECK_INTERVAL, DEFAULT_METRIC_TTL};
