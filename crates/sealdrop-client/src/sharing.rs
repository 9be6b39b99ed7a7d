//! SharingProtocol: re-wrap a file key for another identity
//!
//! Every grantee gets an independently wrapped copy of the key in a new
//! blob; the owner's key blob is never reused.

use crate::{ClientError, PipelineStep, Result, Session};
use chrono::Utc;
use sealdrop_blockstore::ContentAddress;
use sealdrop_core::{CoreError, Identity, ShareGrant};
use sealdrop_crypto::WrappedKeyBlob;
use tracing::{debug, info, instrument};

impl Session {
    /// Grant `recipient` access to `content`
    #[instrument(skip(self), fields(identity = %self.identity()))]
    pub async fn share(&self, content: &ContentAddress, recipient: &Identity) -> Result<ShareGrant> {
        if recipient == self.identity() {
            return Err(ClientError::Input("cannot share a file with yourself".to_string()));
        }

        let recipient_key = match self.public_key_of(recipient).await {
            Ok(key) => key,
            Err(ClientError::Core(CoreError::NotFound(_))) => {
                return Err(ClientError::at(
                    PipelineStep::RecipientKey,
                    ClientError::RecipientHasNoKey(recipient.clone()),
                ))
            }
            Err(e) => return Err(ClientError::at(PipelineStep::RecipientKey, e)),
        };

        let source = self
            .resolve_key_source(content)
            .await
            .map_err(|e| ClientError::at(PipelineStep::Lookup, e))?;
        let file_key = self.open_file_key(&source).await?;
        debug!("file key recovered");

        let key_blob = WrappedKeyBlob::seal(&file_key, &recipient_key)
            .and_then(|blob| blob.to_json_bytes())
            .map_err(|e| ClientError::at(PipelineStep::WrapUpload, e))?;
        let key_blob_address = self
            .blobs
            .publish(&key_blob)
            .await
            .map_err(|e| ClientError::at(PipelineStep::WrapUpload, e))?;

        let grant = ShareGrant {
            content_address: *content,
            key_blob_address,
            grantor: self.identity().clone(),
            grantee: recipient.clone(),
            created_at: Utc::now(),
            extension: source.extension,
        };
        self.ledger
            .write_share_grant(&grant)
            .await
            .map_err(|e| ClientError::at(PipelineStep::GrantWrite, e))?;

        info!(%content, grantee = %recipient, "file shared");
        Ok(grant)
    }
}
