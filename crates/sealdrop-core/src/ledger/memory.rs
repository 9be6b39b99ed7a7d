//! In-memory ledger for testing and local development

use super::{AuthProof, Ledger, ScanFilter};
use crate::{address::Identity, CoreError, LedgerAddress, Result};
use async_trait::async_trait;
use bytes::Bytes;
use dashmap::{mapref::entry::Entry, DashMap};
use std::sync::Arc;

#[derive(Clone)]
struct StoredEntry {
    authority: Identity,
    data: Bytes,
}

/// A DashMap-backed ledger
#[derive(Clone, Default)]
pub struct MemoryLedger {
    entries: Arc<DashMap<LedgerAddress, StoredEntry>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Store bytes without any authority checks
    ///
    /// Lets tests plant foreign or corrupted entries.
    pub fn insert_raw(&self, address: LedgerAddress, authority: Identity, data: impl Into<Bytes>) {
        self.entries.insert(
            address,
            StoredEntry {
                authority,
                data: data.into(),
            },
        );
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    async fn create(&self, address: &LedgerAddress, data: &[u8], proof: &AuthProof) -> Result<()> {
        match self.entries.entry(*address) {
            Entry::Occupied(_) => Err(CoreError::AlreadyExists(address.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(StoredEntry {
                    authority: proof.identity().clone(),
                    data: Bytes::copy_from_slice(data),
                });
                Ok(())
            }
        }
    }

    async fn write(&self, address: &LedgerAddress, data: &[u8], proof: &AuthProof) -> Result<()> {
        match self.entries.entry(*address) {
            Entry::Occupied(mut existing) => {
                if existing.get().authority != *proof.identity() {
                    return Err(CoreError::NotAuthorized(format!(
                        "{} is held by another identity",
                        address
                    )));
                }
                existing.get_mut().data = Bytes::copy_from_slice(data);
            }
            Entry::Vacant(slot) => {
                slot.insert(StoredEntry {
                    authority: proof.identity().clone(),
                    data: Bytes::copy_from_slice(data),
                });
            }
        }
        Ok(())
    }

    async fn read(&self, address: &LedgerAddress) -> Result<Option<Bytes>> {
        Ok(self.entries.get(address).map(|e| e.data.clone()))
    }

    async fn scan(&self, filter: ScanFilter<'_>) -> Result<Vec<(LedgerAddress, Bytes)>> {
        Ok(self
            .entries
            .iter()
            .filter(|e| filter(&e.value().data))
            .map(|e| (*e.key(), e.value().data.clone()))
            .collect())
    }

    async fn delete_at(&self, address: &LedgerAddress, proof: &AuthProof) -> Result<()> {
        match self.entries.entry(*address) {
            Entry::Vacant(_) => Err(CoreError::NotFound(address.to_string())),
            Entry::Occupied(existing) => {
                if existing.get().authority != *proof.identity() {
                    return Err(CoreError::NotAuthorized(format!(
                        "{} is held by another identity",
                        address
                    )));
                }
                existing.remove();
                Ok(())
            }
        }
    }
}
