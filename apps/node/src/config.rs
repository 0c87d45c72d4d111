use std::{env, fmt, fs, path, time::Duration};

use peermon::{GossipConfig, MonitorConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read config: {0}")]
    ReadFailed(#[source] std::io::Error),
    #[error("failed to write config: {0}")]
    WriteFailed(#[source] std::io::Error),
    #[error("failed to parse config: {0}")]
    ParseFailed(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    SerializeFailed(#[from] toml::ser::Error),
    #[error("invalid config: {0}")]
    Invalid(#[from] peermon::Error),
    #[error("no config directory available")]
    ConfigPathUnavailable,
}

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub node: Node,
    pub gossip: GossipConfig,
    pub monitor: MonitorConfig,
}

/// What this node reports about itself
#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Node {
    /// How often the `ping` metric is published
    #[serde(with = "peermon::serde_duration")]
    pub ping_interval: Duration,
    /// Lifetime of each `ping`; peers alert once it lapses
    #[serde(with = "peermon::serde_duration")]
    pub ping_ttl: Duration,
}

impl Default for Node {
    fn default() -> Self {
        Self { ping_interval: Duration::from_secs(10), ping_ttl: Duration::from_secs(30) }
    }
}

/// Used to ensure we are actually reading a toml file
fn normalize_toml_path(path: &path::Path) -> path::PathBuf {
    let mut path = path.to_path_buf();
    if path.extension().map(|ext| ext != "toml").unwrap_or(true) {
        path.set_extension("toml");
    }
    path
}

/// Get default config path ($XDG_CONFIG_HOME/peermon/config.toml or
/// $HOME/.config/...)
fn default_config_path() -> Result<path::PathBuf, Error> {
    let path = if let Ok(config_home) = env::var("XDG_CONFIG_HOME") {
        path::PathBuf::from(config_home)
    } else if let Ok(home) = env::var("HOME") {
        path::PathBuf::from(home).join(".config")
    } else {
        return Err(Error::ConfigPathUnavailable);
    };

    Ok(path.join("peermon/config.toml"))
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let write_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str, value: &dyn fmt::Display| {
                writeln!(f, "  {:indent$}{}: {}", "", label, value, indent = level * 2)
            }
        };
        let write_title_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str| {
                writeln!(f, "{:indent$}{}", "", label, indent = level * 2)
            }
        };

        let write_title_1 = write_title_indented(1);
        let write_1 = write_indented(1);

        writeln!(f, "Current Configuration:")?;
        write_title_1(f, "Node")?;
        write_1(f, "Ping Interval", &format!("{:?}", self.node.ping_interval))?;
        write_1(f, "Ping TTL", &format!("{:?}", self.node.ping_ttl))?;
        write_title_1(f, "Gossip")?;
        write_1(f, "Listen Address", &self.gossip.listen_addr)?;
        write_1(f, "Bootstrap Peers", &self.gossip.bootstrap_peers.len())?;
        write_1(f, "mDNS", &self.gossip.enable_mdns)?;
        write_title_1(f, "Monitor")?;
        write_1(f, "Window", &self.monitor.window_cap)?;
        write_1(f, "Check Interval (ms)", &self.monitor.check_interval.as_millis())?;
        write_1(f, "Alert Capacity", &self.monitor.alert_capacity)?;

        Ok(())
    }
}

impl Config {
    /// Load the config at `optional_path`, or the default location.
    ///
    /// A missing file is created with default values.
    pub fn from_config(optional_path: Option<impl AsRef<path::Path>>) -> Result<Self, Error> {
        let config_path: path::PathBuf = if let Some(path) = optional_path {
            normalize_toml_path(path.as_ref())
        } else {
            default_config_path()?
        };

        let config = if config_path.exists() {
            let raw_string = fs::read_to_string(&config_path).map_err(Error::ReadFailed)?;
            toml::from_str(raw_string.as_str())?
        } else {
            let config = Self::default();
            config.write_config(&config_path)?;
            config
        };

        config.monitor.validate()?;
        Ok(config)
    }

    /// Serialize and write a config to a file
    pub fn write_config(&self, path: &path::Path) -> Result<(), Error> {
        let config_str: String = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(Error::WriteFailed)?;
        }

        fs::write(path, config_str).map_err(Error::WriteFailed)
    }
}
