//! Error types for the sealdrop-core crate

use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors that can occur in ledger, vault, and local storage operations
#[derive(Error, Debug)]
pub enum CoreError {
    /// Record or local entry not found
    #[error("not found: {0}")]
    NotFound(String),

    /// Record already exists at the address
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// Requestor does not own the record
    #[error("not authorized: {0}")]
    NotAuthorized(String),

    /// Vault unlock failed; deliberately says nothing about why
    #[error("bad credential")]
    BadCredential,

    /// Invalid identity string
    #[error("invalid identity: {0}")]
    InvalidIdentity(String),

    /// Invalid ledger address string
    #[error("invalid ledger address: {0}")]
    InvalidAddress(String),

    /// Record bytes do not match the expected schema
    #[error("invalid record: {0}")]
    InvalidRecord(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Backing storage error
    #[error("storage error: {0}")]
    Storage(String),

    /// Block store error
    #[error("block store error: {0}")]
    BlockStore(#[from] sealdrop_blockstore::BlockStoreError),

    /// Crypto error
    #[error("crypto error: {0}")]
    Crypto(#[from] sealdrop_crypto::CryptoError),
}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        CoreError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serialization(err.to_string())
    }
}
