//! # Sealdrop Blockstore
//!
//! Content-addressed blob storage for the Sealdrop envelope-encryption system.
//!
//! This crate provides:
//! - **Blob operations**: publish and fetch opaque byte strings by content address
//! - **CID generation**: CIDv1 raw / SHA2-256 addresses with a stable string form
//! - **Memory store**: in-process store for tests and local development
//! - **IPFS adapter**: HTTP API client for a Kubo-compatible node
//!
//! The store is append-only. There is no delete primitive; "deleting a file"
//! elsewhere in the system means forgetting its ledger record.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │      Upload / Retrieval pipelines       │
//! ├─────────────────────────────────────────┤
//! │             BlobStore Trait             │
//! ├────────────────────┬────────────────────┤
//! │   IpfsBlockStore   │  MemoryBlockStore  │
//! ├────────────────────┴────────────────────┤
//! │              IPFS HTTP API              │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use sealdrop_blockstore::{BlobStore, IpfsBlockStore, IpfsConfig};
//!
//! let store = IpfsBlockStore::new(IpfsConfig::with_url("http://localhost:5001"))?;
//! let address = store.publish(&ciphertext).await?;
//! let fetched = store.fetch(&address).await?;
//! ```

pub mod cid_utils;
pub mod error;
pub mod ipfs;
pub mod memory;

pub use cid_utils::{create_cid, parse_cid, verify_cid, ContentAddress};
pub use error::{BlockStoreError, Result};
pub use ipfs::{IpfsBlockStore, IpfsConfig};
pub use memory::MemoryBlockStore;

use async_trait::async_trait;
use bytes::Bytes;

/// Trait for content-addressed blob backends
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store a blob and return its address
    ///
    /// Publishing identical bytes twice yields the same address and has no
    /// further effect.
    async fn publish(&self, data: &[u8]) -> Result<ContentAddress>;

    /// Retrieve a blob by address
    async fn fetch(&self, address: &ContentAddress) -> Result<Bytes>;

    /// Check if a blob exists
    async fn has(&self, address: &ContentAddress) -> Result<bool>;
}

#[async_trait]
impl<T: BlobStore + ?Sized> BlobStore for std::sync::Arc<T> {
    async fn publish(&self, data: &[u8]) -> Result<ContentAddress> {
        (**self).publish(data).await
    }

    async fn fetch(&self, address: &ContentAddress) -> Result<Bytes> {
        (**self).fetch(address).await
    }

    async fn has(&self, address: &ContentAddress) -> Result<bool> {
        (**self).has(address).await
    }
}
