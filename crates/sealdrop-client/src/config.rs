//! Client configuration

use crate::{ClientError, Result};
use sealdrop_crypto::MIN_RSA_BITS;
use std::time::Duration;

/// Client configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// RSA modulus size for newly registered identities
    pub rsa_bits: usize,
    /// How long an unlocked private key stays cached in the session;
    /// `None` prompts for the password on every operation
    pub key_cache_ttl: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rsa_bits: 2048,
            key_cache_ttl: None,
        }
    }
}

impl Config {
    /// Set the RSA modulus size
    pub fn with_rsa_bits(mut self, bits: usize) -> Self {
        self.rsa_bits = bits;
        self
    }

    /// Cache the unlocked private key for `ttl`
    pub fn with_key_cache(mut self, ttl: Duration) -> Self {
        self.key_cache_ttl = Some(ttl);
        self
    }

    /// Reject values under the security floors
    pub fn validate(&self) -> Result<()> {
        if self.rsa_bits < MIN_RSA_BITS {
            return Err(ClientError::Config(format!(
                "rsa_bits must be at least {}, got {}",
                MIN_RSA_BITS, self.rsa_bits
            )));
        }
        if self.rsa_bits % 8 != 0 {
            return Err(ClientError::Config(format!(
                "rsa_bits must be a multiple of 8, got {}",
                self.rsa_bits
            )));
        }
        if self.key_cache_ttl.is_some_and(|ttl| ttl.is_zero()) {
            return Err(ClientError::Config(
                "key_cache_ttl must be positive; use None to disable caching".to_string(),
            ));
        }
        Ok(())
    }
}
