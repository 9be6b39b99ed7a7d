//! MetadataLedger: typed access to file records, public keys, and share grants

use crate::{
    address::{file_record_address, public_key_address, share_grant_address, Identity, LedgerAddress, RecordKind},
    ledger::{AuthProof, Ledger},
    records::{probe_kind, FileRecord, LedgerRecord, PublicKeyRecord, ShareGrant},
    CoreError, Result,
};
use sealdrop_blockstore::ContentAddress;
use tracing::{debug, info, instrument, warn};

/// Typed adapter over a raw [`Ledger`]
pub struct MetadataLedger<L> {
    ledger: L,
}

impl<L: Ledger> MetadataLedger<L> {
    pub fn new(ledger: L) -> Self {
        Self { ledger }
    }

    /// The underlying raw ledger
    pub fn inner(&self) -> &L {
        &self.ledger
    }

    async fn read_record(&self, address: &LedgerAddress) -> Result<Option<LedgerRecord>> {
        match self.ledger.read(address).await? {
            Some(bytes) => Ok(Some(LedgerRecord::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Scan one record kind, skipping entries that fail to decode
    async fn scan_kind(&self, kind: RecordKind) -> Result<Vec<LedgerRecord>> {
        let hits = self
            .ledger
            .scan(&move |bytes: &[u8]| probe_kind(bytes) == Some(kind))
            .await?;

        let mut records = Vec::with_capacity(hits.len());
        for (address, bytes) in hits {
            match LedgerRecord::decode(&bytes) {
                Ok(record) if record.address() == address => records.push(record),
                Ok(_) => warn!(%address, %kind, "skipping record stored at a foreign address"),
                Err(e) => warn!(%address, %kind, error = %e, "skipping malformed record"),
            }
        }
        Ok(records)
    }

    // ---- file records ----

    /// Write a file record at its derived address
    ///
    /// Same-owner rewrites replace the record; records owned by another
    /// identity are refused with `NotAuthorized`.
    #[instrument(skip(self, record), fields(content = %record.content_address, owner = %record.owner))]
    pub async fn write_file_record(&self, record: &FileRecord) -> Result<LedgerAddress> {
        let address = record.address();
        let bytes = LedgerRecord::File(record.clone()).encode()?;
        self.ledger
            .write(&address, &bytes, &AuthProof::new(record.owner.clone()))
            .await?;
        debug!(%address, "wrote file record");
        Ok(address)
    }

    /// Read the file record at `address`
    pub async fn read_file_record(&self, address: &LedgerAddress) -> Result<FileRecord> {
        match self.read_record(address).await? {
            Some(LedgerRecord::File(record)) => Ok(record),
            Some(other) => Err(CoreError::InvalidRecord(format!(
                "expected file_metadata at {}, found {}",
                address,
                other.kind()
            ))),
            None => Err(CoreError::NotFound(format!("file record {}", address))),
        }
    }

    /// Read the file record for a ciphertext address
    pub async fn find_file_record(&self, content: &ContentAddress) -> Result<FileRecord> {
        self.read_file_record(&file_record_address(content)).await
    }

    /// Read a file record on behalf of `requestor`
    ///
    /// Owners always see their records; others only see public ones.
    pub async fn read_file_record_as(&self, address: &LedgerAddress, requestor: &Identity) -> Result<FileRecord> {
        let record = self.read_file_record(address).await?;
        if record.owner == *requestor || record.is_public {
            Ok(record)
        } else {
            Err(CoreError::NotAuthorized(format!(
                "file record {} is private to its owner",
                address
            )))
        }
    }

    /// Delete a file record; only its owner may do so
    #[instrument(skip(self))]
    pub async fn delete_file_record(&self, address: &LedgerAddress, requestor: &Identity) -> Result<()> {
        let record = self.read_file_record(address).await?;
        if record.owner != *requestor {
            return Err(CoreError::NotAuthorized(format!(
                "{} does not own file record {}",
                requestor, address
            )));
        }
        self.ledger
            .delete_at(address, &AuthProof::new(requestor.clone()))
            .await?;
        info!(content = %record.content_address, "deleted file record");
        Ok(())
    }

    /// All file records owned by `owner`, newest first
    #[instrument(skip(self))]
    pub async fn list_files_for(&self, owner: &Identity) -> Result<Vec<FileRecord>> {
        let mut files: Vec<FileRecord> = self
            .scan_kind(RecordKind::FileMetadata)
            .await?
            .into_iter()
            .filter_map(|record| match record {
                LedgerRecord::File(file) if file.owner == *owner => Some(file),
                _ => None,
            })
            .collect();
        files.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(files)
    }

    // ---- public keys ----

    /// Register a public key; an identity can register exactly once
    #[instrument(skip(self, record), fields(owner = %record.owner))]
    pub async fn write_public_key_record(&self, record: &PublicKeyRecord) -> Result<LedgerAddress> {
        let address = record.address();
        let bytes = LedgerRecord::PublicKey(record.clone()).encode()?;
        self.ledger
            .create(&address, &bytes, &AuthProof::new(record.owner.clone()))
            .await
            .map_err(|e| match e {
                CoreError::AlreadyExists(_) => CoreError::AlreadyExists(format!(
                    "a public key is already registered for {}",
                    record.owner
                )),
                other => other,
            })?;
        info!(%address, "registered public key");
        Ok(address)
    }

    /// Look up the registered key of `identity`
    pub async fn read_public_key_record(&self, identity: &Identity) -> Result<PublicKeyRecord> {
        let address = public_key_address(identity);
        match self.read_record(&address).await? {
            Some(LedgerRecord::PublicKey(record)) if record.owner == *identity => Ok(record),
            Some(_) => Err(CoreError::InvalidRecord(format!(
                "unexpected record at user_rsa address {}",
                address
            ))),
            None => Err(CoreError::NotFound(format!("no public key registered for {}", identity))),
        }
    }

    // ---- share grants ----

    /// Write a grant; at most one grant exists per (file, grantee)
    #[instrument(skip(self, grant), fields(content = %grant.content_address, grantee = %grant.grantee))]
    pub async fn write_share_grant(&self, grant: &ShareGrant) -> Result<LedgerAddress> {
        let address = grant.address();
        let bytes = LedgerRecord::Grant(grant.clone()).encode()?;
        self.ledger
            .create(&address, &bytes, &AuthProof::new(grant.grantor.clone()))
            .await
            .map_err(|e| match e {
                CoreError::AlreadyExists(_) => CoreError::AlreadyExists(format!(
                    "{} already holds a grant for {}",
                    grant.grantee, grant.content_address
                )),
                other => other,
            })?;
        debug!(%address, "wrote share grant");
        Ok(address)
    }

    /// Read the grant of one file to one grantee
    pub async fn read_share_grant(&self, content: &ContentAddress, grantee: &Identity) -> Result<ShareGrant> {
        let address = share_grant_address(content, grantee);
        match self.read_record(&address).await? {
            Some(LedgerRecord::Grant(grant)) => Ok(grant),
            Some(other) => Err(CoreError::InvalidRecord(format!(
                "expected shared_access at {}, found {}",
                address,
                other.kind()
            ))),
            None => Err(CoreError::NotFound(format!(
                "no grant of {} to {}",
                content, grantee
            ))),
        }
    }

    /// All grants addressed to `grantee`, newest first
    #[instrument(skip(self))]
    pub async fn list_grants_for(&self, grantee: &Identity) -> Result<Vec<ShareGrant>> {
        let mut grants: Vec<ShareGrant> = self
            .scan_kind(RecordKind::SharedAccess)
            .await?
            .into_iter()
            .filter_map(|record| match record {
                LedgerRecord::Grant(grant) if grant.grantee == *grantee => Some(grant),
                _ => None,
            })
            .collect();
        grants.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(grants)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::MemoryLedger;
    use chrono::{Duration, Utc};

    fn id(name: &str) -> Identity {
        Identity::new(name).unwrap()
    }

    fn file(seed: &[u8], owner: &str, is_public: bool) -> FileRecord {
        FileRecord {
            content_address: ContentAddress::for_bytes(seed),
            key_blob_address: ContentAddress::for_bytes(&[seed, b"-key".as_slice()].concat()),
            owner: id(owner),
            created_at: Utc::now(),
            is_public,
            extension: "txt".to_string(),
        }
    }

    fn grant(seed: &[u8], grantee: &str, age_minutes: i64) -> ShareGrant {
        ShareGrant {
            content_address: ContentAddress::for_bytes(seed),
            key_blob_address: ContentAddress::for_bytes(&[seed, grantee.as_bytes()].concat()),
            grantor: id("alice"),
            grantee: id(grantee),
            created_at: Utc::now() - Duration::minutes(age_minutes),
            extension: "pdf".to_string(),
        }
    }

    fn ledger() -> MetadataLedger<MemoryLedger> {
        MetadataLedger::new(MemoryLedger::new())
    }

    #[tokio::test]
    async fn test_file_record_roundtrip() {
        let meta = ledger();
        let record = file(b"a", "alice", true);
        let address = meta.write_file_record(&record).await.unwrap();

        assert_eq!(address, file_record_address(&record.content_address));
        assert_eq!(meta.read_file_record(&address).await.unwrap(), record);
        assert_eq!(meta.find_file_record(&record.content_address).await.unwrap(), record);
    }

    #[tokio::test]
    async fn test_file_record_rewrite_by_other_owner_refused() {
        let meta = ledger();
        let record = file(b"a", "alice", true);
        meta.write_file_record(&record).await.unwrap();

        let mut hijack = record.clone();
        hijack.owner = id("mallory");
        assert!(matches!(
            meta.write_file_record(&hijack).await,
            Err(CoreError::NotAuthorized(_))
        ));

        let mut update = record.clone();
        update.is_public = false;
        meta.write_file_record(&update).await.unwrap();
        assert!(!meta.read_file_record(&record.address()).await.unwrap().is_public);
    }

    #[tokio::test]
    async fn test_visibility() {
        let meta = ledger();
        let private = file(b"p", "alice", false);
        let public = file(b"q", "alice", true);
        meta.write_file_record(&private).await.unwrap();
        meta.write_file_record(&public).await.unwrap();

        assert!(meta.read_file_record_as(&private.address(), &id("alice")).await.is_ok());
        assert!(matches!(
            meta.read_file_record_as(&private.address(), &id("bob")).await,
            Err(CoreError::NotAuthorized(_))
        ));
        assert!(meta.read_file_record_as(&public.address(), &id("bob")).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_file_record() {
        let meta = ledger();
        let record = file(b"a", "alice", true);
        let address = meta.write_file_record(&record).await.unwrap();

        assert!(matches!(
            meta.delete_file_record(&address, &id("bob")).await,
            Err(CoreError::NotAuthorized(_))
        ));
        meta.delete_file_record(&address, &id("alice")).await.unwrap();
        assert!(matches!(meta.read_file_record(&address).await, Err(CoreError::NotFound(_))));
        assert!(matches!(
            meta.delete_file_record(&address, &id("alice")).await,
            Err(CoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_public_key_registered_once() {
        let meta = ledger();
        let first = PublicKeyRecord {
            owner: id("alice"),
            public_key_pem: "first".to_string(),
        };
        let second = PublicKeyRecord {
            owner: id("alice"),
            public_key_pem: "second".to_string(),
        };

        meta.write_public_key_record(&first).await.unwrap();
        assert!(matches!(
            meta.write_public_key_record(&second).await,
            Err(CoreError::AlreadyExists(_))
        ));
        assert_eq!(meta.read_public_key_record(&id("alice")).await.unwrap(), first);
        assert!(matches!(
            meta.read_public_key_record(&id("bob")).await,
            Err(CoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_grants_listed_newest_first() {
        let meta = ledger();
        meta.write_share_grant(&grant(b"old", "bob", 30)).await.unwrap();
        meta.write_share_grant(&grant(b"new", "bob", 1)).await.unwrap();
        meta.write_share_grant(&grant(b"new", "carol", 5)).await.unwrap();

        let grants = meta.list_grants_for(&id("bob")).await.unwrap();
        assert_eq!(grants.len(), 2);
        assert_eq!(grants[0].content_address, ContentAddress::for_bytes(b"new"));
        assert_eq!(grants[1].content_address, ContentAddress::for_bytes(b"old"));

        assert!(matches!(
            meta.write_share_grant(&grant(b"old", "bob", 0)).await,
            Err(CoreError::AlreadyExists(_))
        ));
        assert_eq!(
            meta.read_share_grant(&ContentAddress::for_bytes(b"new"), &id("carol"))
                .await
                .unwrap()
                .grantee,
            id("carol")
        );
    }

    #[test_log::test(tokio::test)]
    async fn test_listing_skips_malformed_records() {
        let raw = MemoryLedger::new();
        let meta = MetadataLedger::new(raw.clone());

        meta.write_file_record(&file(b"good", "alice", true)).await.unwrap();
        meta.write_file_record(&file(b"other", "bob", true)).await.unwrap();

        // right tag, wrong schema
        let bogus = crate::address::derive_address(RecordKind::FileMetadata, ["bogus"]);
        raw.insert_raw(
            bogus,
            id("alice"),
            br#"{"kind":"file_metadata","record":{"owner":"alice"}}"#.to_vec(),
        );
        // valid record planted at the wrong address
        let planted = LedgerRecord::File(file(b"planted", "alice", true)).encode().unwrap();
        raw.insert_raw(
            crate::address::derive_address(RecordKind::FileMetadata, ["elsewhere"]),
            id("alice"),
            planted,
        );
        // unrelated bytes
        raw.insert_raw(
            crate::address::derive_address(RecordKind::UserRsa, ["junk"]),
            id("alice"),
            b"\x00\x01\x02".to_vec(),
        );

        let files = meta.list_files_for(&id("alice")).await.unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].content_address, ContentAddress::for_bytes(b"good"));
    }
}
