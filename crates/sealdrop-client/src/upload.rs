//! UploadPipeline
//!
//! ```text
//! Idle -> KeyFetched -> Encrypted -> Published -> Indexed -> Done
//!   \________\______________\____________\__________> Failed(step)
//! ```
//!
//! Steps run strictly in order and the first failure aborts the pipeline.
//! Blobs published before a failure are left in place: without a file
//! record they are unreachable ciphertext.

use crate::{
    types::{normalize_extension, UploadOptions},
    ClientError, PipelineStep, Result, Session,
};
use chrono::Utc;
use sealdrop_core::{CoreError, FileRecord};
use sealdrop_crypto::{encrypt_file, AesKey, WrappedKeyBlob};
use tracing::{debug, info, instrument};

impl Session {
    /// Encrypt `data`, publish ciphertext and wrapped key, and index the file
    #[instrument(skip(self, data, options), fields(identity = %self.identity(), size = data.len()))]
    pub async fn upload(&self, data: &[u8], options: UploadOptions) -> Result<FileRecord> {
        let extension = normalize_extension(&options.extension)?;

        // KeyFetched
        let public_key = match self.public_key_of(self.identity()).await {
            Ok(key) => key,
            Err(ClientError::Core(CoreError::NotFound(_))) => {
                return Err(ClientError::at(
                    PipelineStep::FetchKey,
                    ClientError::NoPublicKey(self.identity().clone()),
                ))
            }
            Err(e) => return Err(ClientError::at(PipelineStep::FetchKey, e)),
        };
        debug!("uploader key fetched");

        // Encrypted + published ciphertext
        let file_key = AesKey::generate();
        let ciphertext =
            encrypt_file(data, &file_key).map_err(|e| ClientError::at(PipelineStep::EncryptUpload, e))?;
        let content_address = self
            .blobs
            .publish(&ciphertext)
            .await
            .map_err(|e| ClientError::at(PipelineStep::EncryptUpload, e))?;
        debug!(%content_address, "ciphertext published");

        // Published wrapped key
        let key_blob = WrappedKeyBlob::seal(&file_key, &public_key)
            .and_then(|blob| blob.to_json_bytes())
            .map_err(|e| ClientError::at(PipelineStep::WrapUpload, e))?;
        let key_blob_address = self
            .blobs
            .publish(&key_blob)
            .await
            .map_err(|e| ClientError::at(PipelineStep::WrapUpload, e))?;
        debug!(%key_blob_address, "wrapped key published");

        // Indexed
        let record = FileRecord {
            content_address,
            key_blob_address,
            owner: self.identity().clone(),
            created_at: Utc::now(),
            is_public: options.is_public,
            extension,
        };
        self.ledger
            .write_file_record(&record)
            .await
            .map_err(|e| ClientError::at(PipelineStep::IndexWrite, e))?;

        info!(%content_address, "upload complete");
        Ok(record)
    }
}
