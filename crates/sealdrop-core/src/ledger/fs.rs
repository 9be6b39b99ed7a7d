//! Filesystem ledger: one JSON file per address
//!
//! ```text
//! <root>/<64 hex chars>.json   {"authority":"alice","data":"<base64>"}
//! ```
//!
//! Writes go to a temporary file first and are renamed into place.

use super::{AuthProof, Ledger, ScanFilter};
use crate::{address::Identity, CoreError, LedgerAddress, Result};
use async_trait::async_trait;
use base64::Engine;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, warn};

const ENTRY_EXTENSION: &str = "json";

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct EntryFile {
    authority: Identity,
    data: String,
}

impl EntryFile {
    fn new(authority: &Identity, data: &[u8]) -> Self {
        Self {
            authority: authority.clone(),
            data: base64::engine::general_purpose::STANDARD.encode(data),
        }
    }

    fn data(&self) -> Result<Bytes> {
        base64::engine::general_purpose::STANDARD
            .decode(&self.data)
            .map(Bytes::from)
            .map_err(|e| CoreError::Storage(format!("corrupt ledger entry: {}", e)))
    }
}

/// A ledger persisted under a local directory
pub struct FsLedger {
    root: PathBuf,
    // serializes check-then-write sequences within this process
    write_lock: Mutex<()>,
}

impl FsLedger {
    /// Open (creating if needed) a ledger directory
    pub async fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn entry_path(&self, address: &LedgerAddress) -> PathBuf {
        self.root.join(format!("{}.{}", address.to_hex(), ENTRY_EXTENSION))
    }

    async fn load(&self, address: &LedgerAddress) -> Result<Option<EntryFile>> {
        match tokio::fs::read(self.entry_path(address)).await {
            Ok(bytes) => Ok(Some(
                serde_json::from_slice(&bytes)
                    .map_err(|e| CoreError::Storage(format!("corrupt ledger entry {}: {}", address, e)))?,
            )),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn store(&self, address: &LedgerAddress, entry: &EntryFile) -> Result<()> {
        let path = self.entry_path(address);
        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, serde_json::to_vec(entry)?).await?;
        tokio::fs::rename(&tmp, &path).await?;
        debug!(%address, "stored ledger entry");
        Ok(())
    }
}

#[async_trait]
impl Ledger for FsLedger {
    async fn create(&self, address: &LedgerAddress, data: &[u8], proof: &AuthProof) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        if self.load(address).await?.is_some() {
            return Err(CoreError::AlreadyExists(address.to_string()));
        }
        self.store(address, &EntryFile::new(proof.identity(), data)).await
    }

    async fn write(&self, address: &LedgerAddress, data: &[u8], proof: &AuthProof) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        if let Some(existing) = self.load(address).await? {
            if existing.authority != *proof.identity() {
                return Err(CoreError::NotAuthorized(format!(
                    "{} is held by another identity",
                    address
                )));
            }
        }
        self.store(address, &EntryFile::new(proof.identity(), data)).await
    }

    async fn read(&self, address: &LedgerAddress) -> Result<Option<Bytes>> {
        match self.load(address).await? {
            Some(entry) => Ok(Some(entry.data()?)),
            None => Ok(None),
        }
    }

    async fn scan(&self, filter: ScanFilter<'_>) -> Result<Vec<(LedgerAddress, Bytes)>> {
        let mut hits = Vec::new();
        let mut dir = tokio::fs::read_dir(&self.root).await?;

        while let Some(item) = dir.next_entry().await? {
            let path = item.path();
            if path.extension().and_then(|e| e.to_str()) != Some(ENTRY_EXTENSION) {
                continue;
            }
            let Some(address) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| LedgerAddress::parse(s).ok())
            else {
                continue;
            };

            let data = match self.load(&address).await {
                Ok(Some(entry)) => entry.data(),
                Ok(None) => continue,
                Err(e) => Err(e),
            };
            match data {
                Ok(data) if filter(&data) => hits.push((address, data)),
                Ok(_) => {}
                Err(e) => warn!(%address, error = %e, "skipping unreadable ledger entry"),
            }
        }

        Ok(hits)
    }

    async fn delete_at(&self, address: &LedgerAddress, proof: &AuthProof) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let existing = self
            .load(address)
            .await?
            .ok_or_else(|| CoreError::NotFound(address.to_string()))?;
        if existing.authority != *proof.identity() {
            return Err(CoreError::NotAuthorized(format!(
                "{} is held by another identity",
                address
            )));
        }
        tokio::fs::remove_file(self.entry_path(address)).await?;
        Ok(())
    }
}
