//! CID (Content Identifier) utilities
//!
//! Blobs are addressed by CIDv1 with the raw codec and a SHA2-256 multihash,
//! which is what an IPFS node returns for a single-block add with
//! `cid-version=1&raw-leaves=true`.

use cid::{Cid, Version};
use multihash_codetable::{Code, MultihashDigest};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Multicodec code for raw binary data
pub const RAW_CODEC: u64 = 0x55;

/// Multicodec code for DAG-PB (multi-block IPFS files)
pub const DAG_PB_CODEC: u64 = 0x70;

/// Stable textual address of a published blob
///
/// Renders as the multibase string of the underlying CID and parses back
/// from it, so it survives being stored in ledger records.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentAddress(Cid);

impl ContentAddress {
    /// Compute the address of `data` (CIDv1, raw, sha2-256)
    pub fn for_bytes(data: &[u8]) -> Self {
        Self(create_cid(data))
    }

    /// Parse from the textual form
    pub fn parse(s: &str) -> Result<Self, crate::BlockStoreError> {
        parse_cid(s.trim()).map(Self)
    }

    /// The underlying CID
    pub fn cid(&self) -> &Cid {
        &self.0
    }

    /// Whether the address was derived directly from the blob bytes
    pub fn is_raw(&self) -> bool {
        self.0.codec() == RAW_CODEC
    }

    /// Check `data` against this address
    ///
    /// Only raw addresses can be checked locally; DAG-PB roots produced by
    /// IPFS for large files hash the node encoding, not the bytes.
    pub fn verify(&self, data: &[u8]) -> bool {
        !self.is_raw() || verify_cid(data, &self.0)
    }
}

impl From<Cid> for ContentAddress {
    fn from(cid: Cid) -> Self {
        Self(cid)
    }
}

impl From<ContentAddress> for Cid {
    fn from(address: ContentAddress) -> Self {
        address.0
    }
}

impl fmt::Display for ContentAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for ContentAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentAddress({})", self.0)
    }
}

impl FromStr for ContentAddress {
    type Err = crate::BlockStoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ContentAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ContentAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Create a raw CIDv1 from data using SHA2-256
pub fn create_cid(data: &[u8]) -> Cid {
    Cid::new_v1(RAW_CODEC, Code::Sha2_256.digest(data))
}

/// Verify that data matches a raw CID
pub fn verify_cid(data: &[u8], cid: &Cid) -> bool {
    cid.version() == Version::V1 && create_cid(data) == *cid
}

/// Parse a CID from a string
pub fn parse_cid(s: &str) -> Result<Cid, crate::BlockStoreError> {
    if s.is_empty() {
        return Err(crate::BlockStoreError::InvalidCid("empty string".to_string()));
    }
    s.parse()
        .map_err(|e: cid::Error| crate::BlockStoreError::InvalidCid(e.to_string()))
}
