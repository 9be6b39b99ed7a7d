//! Ledger collaborator
//!
//! A ledger is a flat map from [`LedgerAddress`] to opaque record bytes.
//! Every entry remembers the identity that created it; only that identity
//! may overwrite or delete it. Implementations must tolerate concurrent
//! writes to different addresses.

mod fs;
mod memory;

pub use fs::FsLedger;
pub use memory::MemoryLedger;

use crate::{address::Identity, LedgerAddress, Result};
use async_trait::async_trait;
use bytes::Bytes;

/// Proof that a call is made on behalf of an identity
///
/// Stands in for whatever signature scheme the backing ledger uses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthProof {
    identity: Identity,
}

impl AuthProof {
    pub fn new(identity: Identity) -> Self {
        Self { identity }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }
}

/// Filter used by [`Ledger::scan`]
pub type ScanFilter<'a> = &'a (dyn Fn(&[u8]) -> bool + Send + Sync);

#[async_trait]
pub trait Ledger: Send + Sync {
    /// Create an entry; fails with `AlreadyExists` if the address is taken
    async fn create(&self, address: &LedgerAddress, data: &[u8], proof: &AuthProof) -> Result<()>;

    /// Create or overwrite an entry; overwriting an entry created by another
    /// identity fails with `NotAuthorized`
    async fn write(&self, address: &LedgerAddress, data: &[u8], proof: &AuthProof) -> Result<()>;

    /// Read an entry
    async fn read(&self, address: &LedgerAddress) -> Result<Option<Bytes>>;

    /// Return every entry whose bytes pass `filter`
    async fn scan(&self, filter: ScanFilter<'_>) -> Result<Vec<(LedgerAddress, Bytes)>>;

    /// Delete an entry; fails with `NotFound` if absent and `NotAuthorized`
    /// if it was created by another identity
    async fn delete_at(&self, address: &LedgerAddress, proof: &AuthProof) -> Result<()>;
}

#[async_trait]
impl<T: Ledger + ?Sized> Ledger for std::sync::Arc<T> {
    async fn create(&self, address: &LedgerAddress, data: &[u8], proof: &AuthProof) -> Result<()> {
        (**self).create(address, data, proof).await
    }

    async fn write(&self, address: &LedgerAddress, data: &[u8], proof: &AuthProof) -> Result<()> {
        (**self).write(address, data, proof).await
    }

    async fn read(&self, address: &LedgerAddress) -> Result<Option<Bytes>> {
        (**self).read(address).await
    }

    async fn scan(&self, filter: ScanFilter<'_>) -> Result<Vec<(LedgerAddress, Bytes)>> {
        (**self).scan(filter).await
    }

    async fn delete_at(&self, address: &LedgerAddress, proof: &AuthProof) -> Result<()> {
        (**self).delete_at(address, proof).await
    }
}
