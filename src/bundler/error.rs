//! Error types for bundle construction, key resolution and signing.
//!
//! Every variant carries enough context (paths, expected vs. actual lengths,
//! size bounds) to diagnose a failure from a single log line. [`Error::kind`]
//! collapses the variants onto the coarse taxonomy callers branch on.

use std::{fmt::Display, path::PathBuf};
use thiserror::Error as DeriveError;

/// Result type alias for bundler operations
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse failure categories of the build → validate → sign pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The asset root does not exist.
    PathNotFound,
    /// Reading or writing the filesystem failed.
    IoFailure,
    /// Malformed base64, or key/seed material of the wrong length.
    EncodingFailure,
    /// The container could not be written or does not parse.
    ArchiveFailure,
    /// The container is larger than the configured bound.
    SizeExceeded,
    /// Anything else.
    Other,
}

/// Errors returned by the bundler core.
#[derive(Debug, DeriveError)]
#[non_exhaustive]
pub enum Error {
    /// Asset root missing
    #[error("path not found: {}", path.display())]
    PathNotFound {
        /// Path that was looked up
        path: PathBuf,
    },

    /// Filesystem error with context
    #[error("{context} {}: {source}", path.display())]
    Io {
        /// What was being done
        context: String,
        /// Path involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Bare IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Directory traversal error
    #[error("failed to walk asset tree: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// Key material that does not decode
    #[error("invalid {source_name}: {reason}")]
    EncodingFailure {
        /// Which key source produced the value
        source_name: &'static str,
        /// Why decoding failed
        reason: String,
    },

    /// Key material of the wrong length
    #[error("invalid {source_name}: expected {expected} bytes, got {actual}")]
    InvalidKeyLength {
        /// Which key source produced the value
        source_name: &'static str,
        /// Required decoded length
        expected: usize,
        /// Actual decoded length
        actual: usize,
    },

    /// Container write or read error
    #[error("archive error while {context}: {source}")]
    Archive {
        /// What was being done
        context: String,
        /// Underlying error
        #[source]
        source: zip::result::ZipError,
    },

    /// Container parsed but violates the expected layout
    #[error("invalid archive: {0}")]
    InvalidArchive(String),

    /// Signature missing, malformed or not matching
    #[error("signature verification failed: {0}")]
    Signature(#[from] ed25519_dalek::SignatureError),

    /// Container too large to sign
    #[error("bundle size {size} bytes exceeds maximum of {max} bytes")]
    SizeExceeded {
        /// Actual container size
        size: u64,
        /// Configured upper bound
        max: u64,
    },

    /// Catch-all
    #[error("{0}")]
    GenericError(String),
}

impl Error {
    /// Maps this error onto its [`ErrorKind`].
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::PathNotFound { .. } => ErrorKind::PathNotFound,
            Self::Io { .. } | Self::IoError(_) | Self::WalkDir(_) => ErrorKind::IoFailure,
            Self::EncodingFailure { .. } | Self::InvalidKeyLength { .. } => {
                ErrorKind::EncodingFailure
            }
            Self::Archive { .. } | Self::InvalidArchive(_) => ErrorKind::ArchiveFailure,
            Self::SizeExceeded { .. } => ErrorKind::SizeExceeded,
            Self::Signature(_) | Self::GenericError(_) => ErrorKind::Other,
        }
    }
}

/// Attaches filesystem context to IO results.
pub trait ErrorExt<T> {
    /// Wraps the error with a description of the operation and the path.
    fn fs_context(self, context: &str, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &str, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| Error::Io {
            context: context.to_string(),
            path: path.into(),
            source,
        })
    }
}

/// Attaches archive context to zip results.
pub trait ArchiveExt<T> {
    /// Wraps the error with a description of the archive operation.
    fn archive_context(self, context: impl Display) -> Result<T>;
}

impl<T> ArchiveExt<T> for std::result::Result<T, zip::result::ZipError> {
    fn archive_context(self, context: impl Display) -> Result<T> {
        self.map_err(|source| Error::Archive {
            context: context.to_string(),
            source,
        })
    }
}

/// Turns a missing value into a [`Error::GenericError`].
pub trait Context<T> {
    /// Returns the value or an error carrying `msg`.
    fn context<C: Display>(self, msg: C) -> Result<T>;
}

impl<T> Context<T> for Option<T> {
    fn context<C: Display>(self, msg: C) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(msg.to_string()))
    }
}

/// Returns early with a [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($($arg)*)))
    };
}
