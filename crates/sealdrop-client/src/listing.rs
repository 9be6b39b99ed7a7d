//! Listing queries and deletion

use crate::{
    types::{BatchDeleteReport, FileQuery},
    Result, Session,
};
use chrono::Utc;
use sealdrop_blockstore::ContentAddress;
use sealdrop_core::{file_record_address, FileRecord, ShareGrant};
use tracing::{info, instrument, warn};

impl Session {
    /// This identity's files, filtered and sorted by `query`
    #[instrument(skip(self), fields(identity = %self.identity()))]
    pub async fn list_files(&self, query: &FileQuery) -> Result<Vec<FileRecord>> {
        let mut records = self.ledger.list_files_for(self.identity()).await?;
        query.apply(&mut records, Utc::now());
        Ok(records)
    }

    /// Grants addressed to this identity, newest first
    pub async fn list_shared_with_me(&self) -> Result<Vec<ShareGrant>> {
        Ok(self.ledger.list_grants_for(self.identity()).await?)
    }

    /// Forget the file record of `content`
    ///
    /// The ciphertext and key blobs stay in the append-only blob store.
    pub async fn delete_file(&self, content: &ContentAddress) -> Result<()> {
        self.ledger
            .delete_file_record(&file_record_address(content), self.identity())
            .await?;
        Ok(())
    }

    /// Delete several file records, continuing past failures
    #[instrument(skip(self, contents), fields(identity = %self.identity(), count = contents.len()))]
    pub async fn delete_files(&self, contents: &[ContentAddress]) -> BatchDeleteReport {
        let mut report = BatchDeleteReport::default();
        for content in contents {
            match self.delete_file(content).await {
                Ok(()) => report.deleted.push(*content),
                Err(e) => {
                    warn!(%content, error = %e, "delete failed");
                    report.failed.push((*content, e));
                }
            }
        }
        info!(
            deleted = report.deleted.len(),
            failed = report.failed.len(),
            "batch delete finished"
        );
        report
    }
}
