//! Error types for the sealdrop-blockstore crate

use crate::ContentAddress;
use thiserror::Error;

/// Result type alias using `BlockStoreError`
pub type Result<T> = std::result::Result<T, BlockStoreError>;

/// Errors that can occur during blob storage operations
#[derive(Error, Debug)]
pub enum BlockStoreError {
    /// Blob not found
    #[error("blob not found: {0}")]
    NotFound(ContentAddress),

    /// Invalid CID string
    #[error("invalid CID: {0}")]
    InvalidCid(String),

    /// Fetched bytes do not hash to the requested address
    #[error("hash mismatch: expected {expected}, got {actual}")]
    HashMismatch { expected: String, actual: String },

    /// IPFS API error
    #[error("IPFS API error: {0}")]
    IpfsApi(String),

    /// Connection error
    #[error("connection error: {0}")]
    Connection(String),

    /// Timeout error
    #[error("operation timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// HTTP error
    #[error("http error: {0}")]
    Http(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl BlockStoreError {
    /// Whether the caller may retry the same operation
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::IpfsApi(_) | Self::Connection(_) | Self::Timeout { .. } | Self::Http(_)
        )
    }
}

impl From<reqwest::Error> for BlockStoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            BlockStoreError::Timeout { seconds: 30 }
        } else if err.is_connect() {
            BlockStoreError::Connection(err.to_string())
        } else {
            BlockStoreError::Http(err.to_string())
        }
    }
}
