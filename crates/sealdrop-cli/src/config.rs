//! CLI configuration
//!
//! Layered: built-in defaults, then an optional TOML file, then
//! `SEALDROP_*` environment variables. Command-line flags override last.

use crate::CliError;
use sealdrop_blockstore::IpfsConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE: &str = "sealdrop.toml";

/// CLI configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Root for the local ledger and key store
    pub data_dir: PathBuf,
    /// IPFS API URL
    pub ipfs_url: String,
    /// Optional IPFS HTTP gateway for reads
    pub ipfs_gateway: Option<String>,
    /// IPFS request timeout (seconds)
    pub ipfs_timeout_secs: u64,
    /// Use in-memory adapters (nothing persists past the process)
    pub use_memory_store: bool,
    /// RSA modulus size for `register`
    pub rsa_bits: usize,
    /// Keep the unlocked key for this many seconds within one invocation
    pub key_cache_secs: Option<u64>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".sealdrop"),
            ipfs_url: "http://localhost:5001".to_string(),
            ipfs_gateway: None,
            ipfs_timeout_secs: 30,
            use_memory_store: false,
            rsa_bits: 2048,
            key_cache_secs: None,
        }
    }
}

impl CliConfig {
    /// Load defaults, `path` (or `sealdrop.toml` if present), and `SEALDROP_*` env vars
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(CONFIG_FILE).required(false),
        };
        let loaded = config::Config::builder()
            .add_source(file)
            .add_source(config::Environment::with_prefix("SEALDROP").try_parsing(true))
            .build()?
            .try_deserialize()?;
        Ok(loaded)
    }

    /// Ledger directory under the data dir
    pub fn ledger_dir(&self) -> PathBuf {
        self.data_dir.join("ledger")
    }

    /// Key store directory under the data dir
    pub fn keys_dir(&self) -> PathBuf {
        self.data_dir.join("keys")
    }

    pub fn ipfs_config(&self) -> IpfsConfig {
        let config = IpfsConfig::with_url(&self.ipfs_url)
            .with_timeout(Duration::from_secs(self.ipfs_timeout_secs));
        match &self.ipfs_gateway {
            Some(gateway) => config.with_gateway(gateway),
            None => config,
        }
    }

    pub fn client_config(&self) -> sealdrop_client::Config {
        let config = sealdrop_client::Config::default().with_rsa_bits(self.rsa_bits);
        match self.key_cache_secs {
            Some(secs) => config.with_key_cache(Duration::from_secs(secs)),
            None => config,
        }
    }
}
