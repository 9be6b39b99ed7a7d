//! Client error types

use sealdrop_blockstore::BlockStoreError;
use sealdrop_core::{CoreError, Identity};
use sealdrop_crypto::CryptoError;
use std::fmt;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, ClientError>;

/// Coarse classification callers branch on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad argument or local input; the operation never started
    Input,
    /// Wrong password, cancelled prompt, RSA unwrap mismatch, or not the owner
    Auth,
    /// Ciphertext or record failed verification
    Integrity,
    /// Ledger record or blob absent
    NotFound,
    /// Something already exists where it must not
    Conflict,
    /// Network or storage hiccup; safe to retry
    Transient,
}

/// Step of a pipeline at which a failure happened
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PipelineStep {
    // upload
    FetchKey,
    EncryptUpload,
    WrapUpload,
    IndexWrite,
    // retrieval
    Lookup,
    FetchKeyBlob,
    Unlock,
    Unwrap,
    FetchCiphertext,
    Decrypt,
    // sharing
    RecipientKey,
    GrantWrite,
}

impl PipelineStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStep::FetchKey => "fetch-key",
            PipelineStep::EncryptUpload => "encrypt-upload",
            PipelineStep::WrapUpload => "wrap-upload",
            PipelineStep::IndexWrite => "index-write",
            PipelineStep::Lookup => "lookup",
            PipelineStep::FetchKeyBlob => "fetch-key-blob",
            PipelineStep::Unlock => "unlock",
            PipelineStep::Unwrap => "unwrap",
            PipelineStep::FetchCiphertext => "fetch-ciphertext",
            PipelineStep::Decrypt => "decrypt",
            PipelineStep::RecipientKey => "recipient-key",
            PipelineStep::GrantWrite => "grant-write",
        }
    }
}

impl fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client errors
#[derive(Error, Debug)]
pub enum ClientError {
    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid argument
    #[error("invalid input: {0}")]
    Input(String),

    /// The acting identity has not registered a public key
    #[error("no public key registered for {0}")]
    NoPublicKey(Identity),

    /// The share recipient has not registered a public key
    #[error("recipient {0} has no registered key")]
    RecipientHasNoKey(Identity),

    /// The password prompt was dismissed
    #[error("password entry cancelled")]
    Cancelled,

    /// The caller may not perform this operation
    #[error("not authorized: {0}")]
    NotAuthorized(String),

    /// A pipeline step failed
    #[error("{step} failed: {source}")]
    Pipeline {
        step: PipelineStep,
        #[source]
        source: Box<ClientError>,
    },

    /// Core error
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Blob store error
    #[error(transparent)]
    BlockStore(#[from] BlockStoreError),

    /// Crypto error
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

impl ClientError {
    /// Tag an error with the pipeline step it came from
    pub fn at(step: PipelineStep, err: impl Into<ClientError>) -> Self {
        ClientError::Pipeline {
            step,
            source: Box::new(err.into()),
        }
    }

    /// The failed pipeline step, if any
    pub fn step(&self) -> Option<PipelineStep> {
        match self {
            ClientError::Pipeline { step, .. } => Some(*step),
            _ => None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Config(_) | ClientError::Input(_) => ErrorKind::Input,
            ClientError::NoPublicKey(_) | ClientError::RecipientHasNoKey(_) => ErrorKind::NotFound,
            ClientError::Cancelled | ClientError::NotAuthorized(_) => ErrorKind::Auth,
            ClientError::Pipeline { source, .. } => source.kind(),
            ClientError::Core(e) => core_kind(e),
            ClientError::BlockStore(e) => blockstore_kind(e),
            ClientError::Crypto(e) => crypto_kind(e),
        }
    }

    /// Whether retrying the same call may succeed
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Transient
    }
}

impl From<&CoreError> for ErrorKind {
    fn from(err: &CoreError) -> Self {
        core_kind(err)
    }
}

impl From<&BlockStoreError> for ErrorKind {
    fn from(err: &BlockStoreError) -> Self {
        blockstore_kind(err)
    }
}

fn core_kind(err: &CoreError) -> ErrorKind {
    match err {
        CoreError::NotFound(_) => ErrorKind::NotFound,
        CoreError::AlreadyExists(_) => ErrorKind::Conflict,
        CoreError::NotAuthorized(_) | CoreError::BadCredential => ErrorKind::Auth,
        CoreError::InvalidIdentity(_) | CoreError::InvalidAddress(_) => ErrorKind::Input,
        CoreError::InvalidRecord(_) | CoreError::Serialization(_) => ErrorKind::Integrity,
        CoreError::Storage(_) => ErrorKind::Transient,
        CoreError::BlockStore(e) => blockstore_kind(e),
        CoreError::Crypto(e) => crypto_kind(e),
    }
}

fn blockstore_kind(err: &BlockStoreError) -> ErrorKind {
    match err {
        BlockStoreError::NotFound(_) => ErrorKind::NotFound,
        BlockStoreError::InvalidCid(_) | BlockStoreError::Configuration(_) => ErrorKind::Input,
        BlockStoreError::HashMismatch { .. } => ErrorKind::Integrity,
        BlockStoreError::IpfsApi(_)
        | BlockStoreError::Connection(_)
        | BlockStoreError::Timeout { .. }
        | BlockStoreError::Http(_) => ErrorKind::Transient,
    }
}

fn crypto_kind(err: &CryptoError) -> ErrorKind {
    match err {
        CryptoError::Unwrap => ErrorKind::Auth,
        CryptoError::Authentication
        | CryptoError::InvalidCiphertext(_)
        | CryptoError::InvalidNonce(_)
        | CryptoError::Base64Decode(_)
        | CryptoError::Serialization(_) => ErrorKind::Integrity,
        CryptoError::KeyGeneration(_)
        | CryptoError::Encryption(_)
        | CryptoError::InvalidKey(_)
        | CryptoError::InvalidPem(_)
        | CryptoError::HexDecode(_) => ErrorKind::Input,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sealdrop_blockstore::ContentAddress;

    #[test]
    fn test_pipeline_error_keeps_kind_and_step() {
        let err = ClientError::at(PipelineStep::Decrypt, CryptoError::Authentication);
        assert_eq!(err.step(), Some(PipelineStep::Decrypt));
        assert_eq!(err.kind(), ErrorKind::Integrity);
        assert!(err.to_string().starts_with("decrypt failed: authentication failed"));
    }

    #[test]
    fn test_wrong_password_and_tamper_are_distinct() {
        let unlock = ClientError::at(PipelineStep::Unlock, CoreError::BadCredential);
        let tamper = ClientError::at(PipelineStep::Decrypt, CryptoError::Authentication);
        assert_eq!(unlock.kind(), ErrorKind::Auth);
        assert_eq!(tamper.kind(), ErrorKind::Integrity);
    }

    #[test]
    fn test_taxonomy() {
        let missing = ContentAddress::for_bytes(b"x");
        assert_eq!(
            ClientError::from(BlockStoreError::NotFound(missing)).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            ClientError::from(BlockStoreError::Timeout { seconds: 3 }).kind(),
            ErrorKind::Transient
        );
        assert!(ClientError::from(BlockStoreError::Connection("refused".into())).is_retryable());
        assert_eq!(
            ClientError::from(CoreError::AlreadyExists("k".into())).kind(),
            ErrorKind::Conflict
        );
        assert_eq!(ClientError::from(CryptoError::Unwrap).kind(), ErrorKind::Auth);
        assert_eq!(
            ClientError::from(CoreError::Crypto(CryptoError::Authentication)).kind(),
            ErrorKind::Integrity
        );
        assert_eq!(ClientError::Input("no file".into()).kind(), ErrorKind::Input);
    }

    #[test]
    fn test_blockstore_kind_agrees_with_is_transient() {
        let errors = [
            BlockStoreError::NotFound(ContentAddress::for_bytes(b"x")),
            BlockStoreError::InvalidCid("zzz".into()),
            BlockStoreError::HashMismatch {
                expected: "a".into(),
                actual: "b".into(),
            },
            BlockStoreError::IpfsApi("500: boom".into()),
            BlockStoreError::Connection("refused".into()),
            BlockStoreError::Timeout { seconds: 3 },
            BlockStoreError::Http("reset".into()),
            BlockStoreError::Configuration("empty url".into()),
        ];
        for err in &errors {
            assert_eq!(
                ErrorKind::from(err) == ErrorKind::Transient,
                err.is_transient(),
                "classifications disagree for {err:?}"
            );
        }
    }
}
