//! In-memory blob store for testing and local development

use crate::{BlobStore, BlockStoreError, ContentAddress, Result};
use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, instrument};

/// An in-memory blob store
#[derive(Clone, Default)]
pub struct MemoryBlockStore {
    blobs: Arc<DashMap<ContentAddress, Bytes>>,
}

impl MemoryBlockStore {
    /// Create a new empty memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of blobs stored
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    /// Get total size of all blobs
    pub fn total_size(&self) -> u64 {
        self.blobs.iter().map(|entry| entry.value().len() as u64).sum()
    }

    /// List all addresses
    pub fn addresses(&self) -> Vec<ContentAddress> {
        self.blobs.iter().map(|entry| *entry.key()).collect()
    }
}

#[async_trait]
impl BlobStore for MemoryBlockStore {
    #[instrument(skip(self, data), fields(size = data.len()))]
    async fn publish(&self, data: &[u8]) -> Result<ContentAddress> {
        let address = ContentAddress::for_bytes(data);
        self.blobs
            .entry(address)
            .or_insert_with(|| Bytes::copy_from_slice(data));
        debug!(%address, "published blob");
        Ok(address)
    }

    async fn fetch(&self, address: &ContentAddress) -> Result<Bytes> {
        self.blobs
            .get(address)
            .map(|entry| entry.value().clone())
            .ok_or(BlockStoreError::NotFound(*address))
    }

    async fn has(&self, address: &ContentAddress) -> Result<bool> {
        Ok(self.blobs.contains_key(address))
    }
}
