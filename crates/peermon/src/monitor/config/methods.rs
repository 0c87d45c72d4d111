//! Monitor configuration methods.

use std::{fs, path::Path, time::Duration};

use super::types::{MonitorConfig, MonitorConfigBuilder};
use crate::error::{Error, Result};

impl MonitorConfig {
    /// Reject zero-valued settings.
    pub fn validate(&self) -> Result<()> {
        if self.window_cap == 0 {
            return Err(Error::InvalidConfig("window_cap must be at least 1".into()));
        }
        if self.check_interval.is_zero() {
            return Err(Error::InvalidConfig("check_interval must be positive".into()));
        }
        if self.alert_capacity == 0 {
            return Err(Error::InvalidConfig("alert_capacity must be at least 1".into()));
        }
        if self.default_ttl.is_zero() {
            return Err(Error::InvalidConfig("default_ttl must be positive".into()));
        }
        Ok(())
    }

    /// Parse and validate a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a TOML config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Set the history window size
    pub fn with_window_cap(mut self, window_cap: usize) -> Self {
        self.window_cap = window_cap;
        self
    }

    /// Set the sweep interval
    pub fn with_check_interval(mut self, interval: Duration) -> Self {
        self.check_interval = interval;
        self
    }
}

impl MonitorConfigBuilder {
    /// Build the configuration
    pub fn build(self) -> MonitorConfig {
        self.config
    }

    pub fn window_cap(mut self, window_cap: usize) -> Self {
        self.config.window_cap = window_cap;
        self
    }

    pub fn check_interval(mut self, interval: Duration) -> Self {
        self.config.check_interval = interval;
        self
    }

    pub fn alert_capacity(mut self, capacity: usize) -> Self {
        self.config.alert_capacity = capacity;
        self
    }

    pub fn default_ttl(mut self, ttl: Duration) -> Self {
        self.config.default_ttl = ttl;
        self
    }
}
