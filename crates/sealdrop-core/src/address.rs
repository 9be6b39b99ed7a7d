//! Identities and deterministic ledger addresses
//!
//! A ledger address is `keccak256(kind_tag ‖ part_1 ‖ … ‖ part_n)`, shown as
//! 64 lowercase hex characters. The tags and part layouts are stable across
//! runs and implementations:
//!
//! | Record | Tag | Parts |
//! |---|---|---|
//! | `FileRecord` | `file_metadata` | `keccak256(content_address)` |
//! | `PublicKeyRecord` | `user_rsa` | `identity` |
//! | `ShareGrant` | `shared_access` | `keccak256(content_address)`, `grantee` |

use crate::{CoreError, Result};
use sealdrop_blockstore::ContentAddress;
use sealdrop_crypto::{keccak256, keccak256_concat, Keccak256Hash};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A stable string naming a user; the ownership key for every record
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Parse an identity; surrounding whitespace is dropped and empty
    /// strings or strings with inner whitespace are rejected
    pub fn new(value: impl AsRef<str>) -> Result<Self> {
        let value = value.as_ref().trim();
        if value.is_empty() {
            return Err(CoreError::InvalidIdentity("identity must not be empty".to_string()));
        }
        if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(CoreError::InvalidIdentity(format!(
                "identity must not contain whitespace: {:?}",
                value
            )));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({})", self.0)
    }
}

impl FromStr for Identity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl AsRef<str> for Identity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Identity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(serde::de::Error::custom)
    }
}

/// The three record kinds kept in the ledger
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    #[serde(rename = "file_metadata")]
    FileMetadata,
    #[serde(rename = "user_rsa")]
    UserRsa,
    #[serde(rename = "shared_access")]
    SharedAccess,
}

impl RecordKind {
    /// Tag hashed into every address of this kind
    pub fn tag(&self) -> &'static str {
        match self {
            RecordKind::FileMetadata => "file_metadata",
            RecordKind::UserRsa => "user_rsa",
            RecordKind::SharedAccess => "shared_access",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Deterministic address of a ledger record
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LedgerAddress(Keccak256Hash);

impl LedgerAddress {
    /// Parse the 64-char hex form
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.len() != 64 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(CoreError::InvalidAddress(s.to_string()));
        }
        Keccak256Hash::from_hex(&s.to_ascii_lowercase())
            .map(Self)
            .map_err(|e| CoreError::InvalidAddress(e.to_string()))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_bytes()
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl fmt::Display for LedgerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for LedgerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LedgerAddress({})", self.0)
    }
}

impl FromStr for LedgerAddress {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for LedgerAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for LedgerAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Hash a record kind tag together with its key parts
pub fn derive_address<I, T>(kind: RecordKind, parts: I) -> LedgerAddress
where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    let tag = kind.tag().as_bytes().to_vec();
    let parts = std::iter::once(tag).chain(parts.into_iter().map(|p| p.as_ref().to_vec()));
    LedgerAddress(keccak256_concat(parts))
}

/// Address of the `FileRecord` for a ciphertext
pub fn file_record_address(content: &ContentAddress) -> LedgerAddress {
    derive_address(RecordKind::FileMetadata, [content_hash(content)])
}

/// Address of an identity's `PublicKeyRecord`
pub fn public_key_address(identity: &Identity) -> LedgerAddress {
    derive_address(RecordKind::UserRsa, [identity.as_str().as_bytes()])
}

/// Address of the `ShareGrant` for a (ciphertext, grantee) pair
pub fn share_grant_address(content: &ContentAddress, grantee: &Identity) -> LedgerAddress {
    let hash = content_hash(content);
    derive_address(
        RecordKind::SharedAccess,
        [hash.as_bytes().as_slice(), grantee.as_str().as_bytes()],
    )
}

fn content_hash(content: &ContentAddress) -> Keccak256Hash {
    keccak256(content.to_string())
}
