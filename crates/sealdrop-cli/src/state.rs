//! Adapter wiring

use crate::{CliConfig, Result};
use sealdrop_blockstore::IpfsBlockStore;
use sealdrop_client::Backends;
use sealdrop_core::{FsLedger, FsSecureStore};
use std::sync::Arc;
use tracing::{info, warn};

/// Build the adapters described by `config`
///
/// Persistent mode keeps the ledger and key store under the data dir and
/// publishes blobs to IPFS.
pub async fn open_backends(config: &CliConfig) -> Result<Backends> {
    if config.use_memory_store {
        warn!("using in-memory storage - data will NOT persist");
        return Ok(Backends::in_memory());
    }

    let blobs = IpfsBlockStore::new(config.ipfs_config())?;
    let ledger = FsLedger::open(config.ledger_dir()).await?;
    let keys = FsSecureStore::open(config.keys_dir()).await?;
    info!(
        ipfs = %config.ipfs_url,
        data_dir = %config.data_dir.display(),
        "storage ready"
    );

    Ok(Backends::new(Arc::new(blobs), Arc::new(ledger), Arc::new(keys)))
}
