//! Access to the authoritative cluster peer set.

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use tracing::error;

use crate::error::{Error, Result};

/// Remote source of truth for the current cluster members.
#[async_trait]
pub trait PeerSetResolver: Send + Sync + 'static {
    async fn peers(&self) -> anyhow::Result<Vec<String>>;
}

/// A fixed peer set.
#[async_trait]
impl PeerSetResolver for Vec<String> {
    async fn peers(&self) -> anyhow::Result<Vec<String>> {
        Ok(self.clone())
    }
}

/// Single-assignment slot for the resolver, shared with background tasks.
#[derive(Clone, Default)]
pub(crate) struct RemotePeers {
    resolver: Arc<OnceLock<Arc<dyn PeerSetResolver>>>,
}

impl RemotePeers {
    /// Store `resolver`; fails if one is already set.
    pub(crate) fn bind(&self, resolver: Arc<dyn PeerSetResolver>) -> Result<()> {
        self.resolver.set(resolver).map_err(|_| Error::ResolverAlreadyBound)
    }

    pub(crate) fn is_bound(&self) -> bool {
        self.resolver.get().is_some()
    }

    /// Ask the resolver for the current peer set, logging failures.
    pub(crate) async fn get_peer_set(&self) -> Result<Vec<String>> {
        let resolver = self.resolver.get().ok_or(Error::ResolverUnbound)?;
        resolver.peers().await.map_err(|e| {
            error!("failed to resolve peer set: {:#}", e);
            Error::PeerSet(e)
        })
    }
}
