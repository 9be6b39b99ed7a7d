//! # Sealdrop Core
//!
//! Metadata and key management for the Sealdrop envelope-encryption system.
//!
//! This crate provides:
//! - **Ledger addressing**: deterministic keccak-256 addresses per record kind
//! - **Typed records**: `FileRecord`, `PublicKeyRecord`, `ShareGrant` with closed schemas
//! - **MetadataLedger**: owner-checked reads, writes, deletes, and scans over any `Ledger`
//! - **KeyVault**: password-locked private keys in local secure storage
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │         Pipelines (sealdrop-client)     │
//! ├────────────────────┬────────────────────┤
//! │   MetadataLedger   │      KeyVault      │
//! ├────────────────────┼────────────────────┤
//! │  Ledger trait      │  SecureStore trait │
//! │  (memory / fs)     │  (memory / fs)     │
//! └────────────────────┴────────────────────┘
//! ```

pub mod address;
pub mod error;
pub mod ledger;
pub mod metadata;
pub mod records;
pub mod secure_store;
pub mod vault;

pub use address::{
    derive_address, file_record_address, public_key_address, share_grant_address, Identity,
    LedgerAddress, RecordKind,
};
pub use error::{CoreError, Result};
pub use ledger::{AuthProof, FsLedger, Ledger, MemoryLedger};
pub use metadata::MetadataLedger;
pub use records::{FileRecord, LedgerRecord, PublicKeyRecord, ShareGrant};
pub use secure_store::{FsSecureStore, MemorySecureStore, SecureStore};
pub use vault::{generate_keypair, lock_private_key, unlock_private_key, KeyVault};
