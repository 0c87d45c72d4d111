//! Node identity keypairs.

use std::{fs, path::Path};

use anyhow::Result;
use libp2p::identity::Keypair;
use tracing::info;

/// Load the keypair at `path`, generating and saving a new Ed25519 one if
/// the file does not exist.
pub fn load_or_generate_keypair<P: AsRef<Path>>(path: P) -> Result<Keypair> {
    let path = path.as_ref();

    if path.exists() {
        load_keypair(path)
    } else {
        let keypair = Keypair::generate_ed25519();
        save_keypair(&keypair, path)?;
        info!("Generated new node identity at {}", path.display());
        Ok(keypair)
    }
}

/// Save a keypair to a file
pub fn save_keypair<P: AsRef<Path>>(keypair: &Keypair, path: P) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let bytes = keypair.to_protobuf_encoding()?;
    fs::write(path, &bytes)?;

    Ok(())
}

/// Load a keypair from a file
pub fn load_keypair<P: AsRef<Path>>(path: P) -> Result<Keypair> {
    let bytes = fs::read(path)?;
    let keypair = Keypair::from_protobuf_encoding(&bytes)?;
    Ok(keypair)
}
