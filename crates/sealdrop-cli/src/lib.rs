//! # Sealdrop CLI
//!
//! Command-line front end for the Sealdrop client SDK.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │          sealdrop <command> (clap, config)          │
//! └─────────────────────────┬───────────────────────────┘
//!                           │
//! ┌─────────────────────────▼───────────────────────────┐
//! │                  sealdrop-client                    │
//! │     (Session: upload, retrieve, share, list)        │
//! ├─────────────────────────────────────────────────────┤
//! │                   sealdrop-core                     │
//! │   (MetadataLedger, KeyVault, FsLedger, key store)   │
//! ├─────────────────────────────────────────────────────┤
//! │                sealdrop-blockstore                  │
//! │                 (IPFS, in-memory)                   │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod password;
pub mod state;

pub use commands::Command;
pub use config::CliConfig;
pub use error::{CliError, ExitStatus, Result};
pub use password::TerminalPassword;
pub use state::open_backends;
