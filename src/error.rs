//! Error types for the command line tool.
//!
//! This module wraps the bundler core errors with CLI concerns and maps each
//! failure to an actionable hint.

use crate::bundler::ErrorKind;
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, BundlerError>;

/// Main error type for the command line tool
#[derive(Error, Debug)]
pub enum BundlerError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Bundler errors
    #[error("Bundler error: {0}")]
    Bundler(#[from] crate::bundler::Error),

    /// Generic errors from anyhow
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Command execution failed
    #[error("Command execution failed: {command} - {reason}")]
    ExecutionFailed {
        /// Command that failed
        command: String,
        /// Reason for the error
        reason: String,
    },
}

impl BundlerError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        let Self::Bundler(inner) = self else {
            return vec!["Check the error message above for specific details".to_string()];
        };

        match inner.kind() {
            ErrorKind::PathNotFound => {
                vec!["Check that --input points at the built asset directory".to_string()]
            }
            ErrorKind::EncodingFailure => vec![
                "BUNDLE_SIGNING_KEY must be base64 of exactly 64 bytes".to_string(),
                "BUNDLE_SIGNING_SEED must be base64 of exactly 32 bytes".to_string(),
            ],
            ErrorKind::SizeExceeded => {
                vec!["Raise --max-size or trim the asset directory".to_string()]
            }
            ErrorKind::IoFailure | ErrorKind::ArchiveFailure | ErrorKind::Other => {
                vec!["Check the error message above for specific details".to_string()]
            }
        }
    }
}
