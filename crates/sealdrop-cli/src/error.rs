//! Error types and process exit codes

use sealdrop_client::{ClientError, ErrorKind};
use thiserror::Error;

/// Process exit codes, one per failure class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Internal,
    Usage,
    InvalidInput,
    AccessDenied,
    IntegrityFailure,
    NotFound,
    Conflict,
    Unavailable,
}

impl ExitStatus {
    /// Short machine-readable label
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Internal => "InternalError",
            Self::Usage => "Usage",
            Self::InvalidInput => "InvalidInput",
            Self::AccessDenied => "AccessDenied",
            Self::IntegrityFailure => "IntegrityFailure",
            Self::NotFound => "NotFound",
            Self::Conflict => "Conflict",
            Self::Unavailable => "Unavailable",
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            Self::Success => 0,
            Self::Internal => 1,
            Self::Usage => 2,
            Self::InvalidInput => 3,
            Self::AccessDenied => 4,
            Self::IntegrityFailure => 5,
            Self::NotFound => 6,
            Self::Conflict => 7,
            Self::Unavailable => 8,
        }
    }
}

impl From<ErrorKind> for ExitStatus {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Input => Self::InvalidInput,
            ErrorKind::Auth => Self::AccessDenied,
            ErrorKind::Integrity => Self::IntegrityFailure,
            ErrorKind::NotFound => Self::NotFound,
            ErrorKind::Conflict => Self::Conflict,
            ErrorKind::Transient => Self::Unavailable,
        }
    }
}

/// CLI error type
#[derive(Error, Debug)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("{0}")]
    Usage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("output error: {0}")]
    Output(#[from] serde_json::Error),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Core(#[from] sealdrop_core::CoreError),

    #[error(transparent)]
    BlockStore(#[from] sealdrop_blockstore::BlockStoreError),
}

impl CliError {
    pub fn exit_status(&self) -> ExitStatus {
        match self {
            Self::Config(_) | Self::Usage(_) => ExitStatus::Usage,
            Self::Io(_) | Self::Output(_) => ExitStatus::Internal,
            Self::Client(e) => e.kind().into(),
            Self::Core(e) => ErrorKind::from(e).into(),
            Self::BlockStore(e) => ErrorKind::from(e).into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
