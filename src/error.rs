//! Error types shared across commands
//!
//! Each layer has its own error enum ([`CacheError`], [`ApiError`],
//! [`DetectError`], [`ScanError`]); commands surface all of them through
//! [`EolError`].

use std::path::PathBuf;

use thiserror::Error;

pub use crate::api::error::ApiError;
pub use crate::scanner::detector::DetectError;
pub use crate::scanner::language::ScanError;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to create cache directory {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to create cache file {path:?}: {source}")]
    CreateFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read cache file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to decode cache file {path:?}: {source}")]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to encode cache: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to write cache file {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum EolError {
    #[error("{0}")]
    Usage(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Detect(#[from] DetectError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("{0}")]
    NotFound(String),

    #[error("failed to render output: {0}")]
    Render(String),

    #[error("failed to export to {path:?}: {source}")]
    Export {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error categories reported to the user and the log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Parse,
    NotFound,
    Config,
    Usage,
    Io,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Network => "network",
            ErrorKind::Parse => "parse",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Config => "config",
            ErrorKind::Usage => "usage",
            ErrorKind::Io => "io",
        }
    }
}

impl EolError {
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Usage(_) => ErrorKind::Usage,
            Self::Config(_) => ErrorKind::Config,
            // Directory and file creation failures mean the data dir is unusable
            Self::Cache(CacheError::CreateDir { .. } | CacheError::CreateFile { .. }) => {
                ErrorKind::Config
            }
            Self::Cache(_) => ErrorKind::Io,
            Self::Api(ApiError::Network(_)) => ErrorKind::Network,
            Self::Api(ApiError::NotFound(_)) => ErrorKind::NotFound,
            Self::Api(ApiError::InvalidResponse(_) | ApiError::Parse(_)) => ErrorKind::Parse,
            Self::Detect(DetectError::VersionNotFound { .. }) => ErrorKind::NotFound,
            Self::Detect(DetectError::Parse { .. }) => ErrorKind::Parse,
            Self::Detect(DetectError::Io { .. }) => ErrorKind::Io,
            Self::Scan(_) => ErrorKind::Io,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Render(_) => ErrorKind::Parse,
            Self::Export { .. } | Self::Io(_) => ErrorKind::Io,
        }
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self.kind() {
            ErrorKind::Usage => 2,
            _ => 1,
        }
    }
}
