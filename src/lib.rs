//! Signed static asset bundles.
//!
//! This library packs a directory of static assets into a single ZIP
//! container with independently zstd-compressed entries, records a BLAKE3
//! digest and MIME type per file, and signs the container with ed25519.
//!
//! It can be used both as a CLI tool and as a library dependency; an HTTP
//! layer consumes [`bundler::BundleManager`] to serve the bundle, its
//! metadata and the verifying key.

pub mod bundler;
pub mod cli;
pub mod error;
pub mod metadata;

// Re-export commonly used types
pub use error::{BundlerError, CliError, Result};
