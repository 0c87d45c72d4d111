use thiserror::Error;

use crate::{protocol::CodecError, transport::TransportError};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("alert queue is full")]
    AlertQueueFull,
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("peer set unavailable: {0:#}")]
    PeerSet(#[source] anyhow::Error),
    #[error("peer set resolver is not bound")]
    ResolverUnbound,
    #[error("peer set resolver is already bound")]
    ResolverAlreadyBound,
    #[error("monitor is shut down")]
    ShutDown,
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to parse configuration: {0}")]
    Config(#[from] toml::de::Error),
    #[error("{0:#}")]
    Io(#[from] std::io::Error),
}
