//! Bundle construction from an asset directory.
//!
//! The builder:
//! 1. Walks the asset root and collects every regular file
//! 2. Normalizes paths to forward slashes relative to the root
//! 3. Writes each file as an independently zstd-compressed ZIP entry
//! 4. Records size, BLAKE3 digest and MIME type per file
//!
//! # Module Organization
//!
//! - [`archive`] - container writer and structural validation
//! - [`checksum`] - per-file content digests
//! - [`mime`] - layered extension → MIME type lookup
//! - [`orchestrator`] - the [`BundleBuilder`] walker

pub mod archive;
pub mod checksum;
pub mod mime;
mod orchestrator;

pub use orchestrator::{BundleBuilder, build};
