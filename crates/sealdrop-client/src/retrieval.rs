//! RetrievalPipeline: resolve the key blob, unlock, unwrap, fetch, decrypt

use crate::{
    types::{Access, RetrievedFile},
    ClientError, PipelineStep, Result, Session,
};
use sealdrop_blockstore::ContentAddress;
use sealdrop_core::{file_record_address, CoreError};
use sealdrop_crypto::{decrypt_file, AesKey, WrappedKeyBlob};
use tracing::{debug, info, instrument};

/// Where the caller's wrapped copy of a file key lives
pub(crate) struct KeySource {
    pub key_blob_address: ContentAddress,
    pub extension: String,
    pub access: Access,
}

impl Session {
    /// Find the wrapped key this identity may open for `content`
    ///
    /// Owners use their file record; anyone else needs a share grant.
    pub(crate) async fn resolve_key_source(&self, content: &ContentAddress) -> Result<KeySource> {
        let address = file_record_address(content);
        let record_exists = match self.ledger.read_file_record_as(&address, self.identity()).await {
            Ok(record) if record.owner == *self.identity() => {
                return Ok(KeySource {
                    key_blob_address: record.key_blob_address,
                    extension: record.extension,
                    access: Access::Owner,
                })
            }
            Ok(_) | Err(CoreError::NotAuthorized(_)) => true,
            Err(CoreError::NotFound(_)) => false,
            Err(e) => return Err(e.into()),
        };

        match self.ledger.read_share_grant(content, self.identity()).await {
            Ok(grant) => Ok(KeySource {
                key_blob_address: grant.key_blob_address,
                extension: grant.extension,
                access: Access::Grant {
                    grantor: grant.grantor,
                },
            }),
            Err(CoreError::NotFound(_)) if record_exists => Err(ClientError::NotAuthorized(format!(
                "{} holds no grant for {}",
                self.identity(),
                content
            ))),
            Err(e) => Err(e.into()),
        }
    }

    /// Fetch, unlock, and unwrap the file key from `source`
    pub(crate) async fn open_file_key(&self, source: &KeySource) -> Result<AesKey> {
        let bytes = self
            .blobs
            .fetch(&source.key_blob_address)
            .await
            .map_err(|e| ClientError::at(PipelineStep::FetchKeyBlob, e))?;
        let blob = WrappedKeyBlob::from_json_bytes(&bytes)
            .map_err(|e| ClientError::at(PipelineStep::FetchKeyBlob, e))?;

        let private_key = self
            .private_key()
            .await
            .map_err(|e| ClientError::at(PipelineStep::Unlock, e))?;

        blob.open(&private_key)
            .map_err(|e| ClientError::at(PipelineStep::Unwrap, e))
    }

    /// Decrypt a file this identity owns or was granted
    #[instrument(skip(self), fields(identity = %self.identity()))]
    pub async fn retrieve(&self, content: &ContentAddress) -> Result<RetrievedFile> {
        let source = self
            .resolve_key_source(content)
            .await
            .map_err(|e| ClientError::at(PipelineStep::Lookup, e))?;
        debug!(access = ?source.access, key_blob = %source.key_blob_address, "key source resolved");

        let file_key = self.open_file_key(&source).await?;

        let ciphertext = self
            .blobs
            .fetch(content)
            .await
            .map_err(|e| ClientError::at(PipelineStep::FetchCiphertext, e))?;
        let data = decrypt_file(&ciphertext, &file_key)
            .map_err(|e| ClientError::at(PipelineStep::Decrypt, e))?;

        info!(%content, size = data.len(), "retrieval complete");
        Ok(RetrievedFile {
            content_address: *content,
            extension: source.extension,
            access: source.access,
            data,
        })
    }
}
