//! # Sealdrop Client SDK
//!
//! Client-side envelope encryption over a content-addressed blob store and
//! a metadata ledger.
//!
//! ## Features
//!
//! - **Registration**: RSA-OAEP key pair, password-locked locally, public key on the ledger
//! - **Upload**: fresh AES-256-GCM key per file, wrapped under the owner's public key
//! - **Retrieval**: by content address, for owners and grantees
//! - **Sharing**: independent key blob per grantee
//! - **Listing & deletion**: time filters, sorting, partial-failure batch delete
//!
//! ## Example
//!
//! ```rust,ignore
//! use sealdrop_client::{Backends, Config, FixedPassword, Session, UploadOptions};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let session = Session::new(
//!         "alice".parse()?,
//!         Backends::in_memory(),
//!         Arc::new(FixedPassword::new("correct horse")),
//!         Config::default(),
//!     )?;
//!
//!     session.register_identity(false).await?;
//!     let record = session.upload(b"HELLOWRLD", UploadOptions::public("txt")).await?;
//!
//!     let file = session.retrieve(&record.content_address).await?;
//!     assert_eq!(file.data, b"HELLOWRLD");
//!
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod listing;
mod password;
mod retrieval;
mod session;
mod sharing;
mod types;
mod upload;

pub use config::Config;
pub use error::{ClientError, ErrorKind, PipelineStep, Result};
pub use password::{FixedPassword, NoPassword, PasswordProvider, NEW_PASSWORD_PROMPT, UNLOCK_PROMPT};
pub use session::{Backends, Session};
pub use types::*;

// Re-export the types callers need to drive a session
pub use sealdrop_blockstore::ContentAddress;
pub use sealdrop_core::{FileRecord, Identity, PublicKeyRecord, ShareGrant};
