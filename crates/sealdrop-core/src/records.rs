//! Typed ledger records
//!
//! Records are stored as UTF-8 JSON, adjacently tagged by kind:
//!
//! ```json
//! {"kind":"file_metadata","record":{"content_address":"bafk...", ...}}
//! ```
//!
//! Each schema is closed: unknown fields and missing required fields are
//! rejected rather than defaulted.

use crate::{
    address::{file_record_address, public_key_address, share_grant_address, Identity, LedgerAddress, RecordKind},
    CoreError, Result,
};
use chrono::{DateTime, Utc};
use sealdrop_blockstore::ContentAddress;
use serde::{Deserialize, Serialize};

/// Index entry for one uploaded ciphertext
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileRecord {
    /// Address of the `iv ‖ ciphertext ‖ tag` object
    pub content_address: ContentAddress,
    /// Address of the owner's wrapped-key blob
    pub key_blob_address: ContentAddress,
    pub owner: Identity,
    pub created_at: DateTime<Utc>,
    /// Whether non-owners may read this record
    pub is_public: bool,
    /// Original file extension, without the dot; may be empty
    pub extension: String,
}

impl FileRecord {
    pub fn address(&self) -> LedgerAddress {
        file_record_address(&self.content_address)
    }
}

/// Registered RSA public key of one identity
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PublicKeyRecord {
    pub owner: Identity,
    /// SPKI PEM (`-----BEGIN PUBLIC KEY-----`)
    pub public_key_pem: String,
}

impl PublicKeyRecord {
    pub fn address(&self) -> LedgerAddress {
        public_key_address(&self.owner)
    }
}

/// Grant of one file to one grantee, carrying a key blob wrapped for them
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShareGrant {
    pub content_address: ContentAddress,
    /// Address of the blob wrapped under the grantee's key
    pub key_blob_address: ContentAddress,
    pub grantor: Identity,
    pub grantee: Identity,
    pub created_at: DateTime<Utc>,
    pub extension: String,
}

impl ShareGrant {
    pub fn address(&self) -> LedgerAddress {
        share_grant_address(&self.content_address, &self.grantee)
    }
}

/// Any record stored in the ledger
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "record", deny_unknown_fields)]
pub enum LedgerRecord {
    #[serde(rename = "file_metadata")]
    File(FileRecord),
    #[serde(rename = "user_rsa")]
    PublicKey(PublicKeyRecord),
    #[serde(rename = "shared_access")]
    Grant(ShareGrant),
}

impl LedgerRecord {
    pub fn kind(&self) -> RecordKind {
        match self {
            LedgerRecord::File(_) => RecordKind::FileMetadata,
            LedgerRecord::PublicKey(_) => RecordKind::UserRsa,
            LedgerRecord::Grant(_) => RecordKind::SharedAccess,
        }
    }

    /// Address this record must be stored at
    pub fn address(&self) -> LedgerAddress {
        match self {
            LedgerRecord::File(r) => r.address(),
            LedgerRecord::PublicKey(r) => r.address(),
            LedgerRecord::Grant(r) => r.address(),
        }
    }

    /// Identity allowed to mutate or delete the record
    pub fn authority(&self) -> &Identity {
        match self {
            LedgerRecord::File(r) => &r.owner,
            LedgerRecord::PublicKey(r) => &r.owner,
            LedgerRecord::Grant(r) => &r.grantor,
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| CoreError::InvalidRecord(e.to_string()))
    }
}

#[derive(Deserialize)]
struct KindProbe {
    kind: RecordKind,
}

/// Read only the kind tag of encoded record bytes
///
/// Returns `None` for bytes that are not a tagged record at all.
pub fn probe_kind(bytes: &[u8]) -> Option<RecordKind> {
    serde_json::from_slice::<KindProbe>(bytes).ok().map(|p| p.kind)
}
