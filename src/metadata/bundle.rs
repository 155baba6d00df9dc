//! The signed bundle and client-side checks against it.

use std::collections::HashMap;

use base64::{Engine, engine::general_purpose::STANDARD};
use ed25519_dalek::{SIGNATURE_LENGTH, Signature, Verifier, VerifyingKey};

use super::{BundleMetadata, FileEntry};
use crate::bundler::{
    Error, Result,
    builder::{archive, checksum},
};

/// A signed container plus its metadata.
///
/// Immutable once built; a rebuild produces a new `Bundle`.
#[derive(Debug, Clone)]
pub struct Bundle {
    metadata: BundleMetadata,
    content: Vec<u8>,
}

/// File content extracted from a bundle and checked against its manifest entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedFile {
    pub path: String,
    pub content: Vec<u8>,
    pub mime_type: Option<String>,
}

impl Bundle {
    /// Pairs metadata with the container bytes it describes.
    ///
    /// Nothing is checked here; use [`Bundle::verify_signature`] and
    /// [`Bundle::verify_files`] on bundles received from elsewhere.
    pub fn from_parts(metadata: BundleMetadata, content: Vec<u8>) -> Self {
        Self { metadata, content }
    }

    pub fn metadata(&self) -> &BundleMetadata {
        &self.metadata
    }

    /// Raw container bytes, exactly as signed.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Manifest entry for `path`.
    pub fn file(&self, path: &str) -> Option<&FileEntry> {
        self.metadata.manifest.get(path)
    }

    /// Decodes the detached signature from the metadata.
    pub fn signature(&self) -> Result<Signature> {
        let bytes = STANDARD
            .decode(&self.metadata.signature)
            .map_err(|e| Error::EncodingFailure {
                source_name: "bundle signature",
                reason: format!("not valid base64 ({e})"),
            })?;
        let actual = bytes.len();
        let bytes: [u8; SIGNATURE_LENGTH] =
            bytes.try_into().map_err(|_| Error::InvalidKeyLength {
                source_name: "bundle signature",
                expected: SIGNATURE_LENGTH,
                actual,
            })?;
        Ok(Signature::from_bytes(&bytes))
    }

    /// Checks the signature over the container bytes with `key`.
    pub fn verify_signature(&self, key: &VerifyingKey) -> Result<()> {
        let signature = self.signature()?;
        key.verify(&self.content, &signature)?;
        Ok(())
    }

    /// Extracts every manifest entry and checks its size and digest.
    ///
    /// Returns the verified files keyed by path.
    pub fn verify_files(&self) -> Result<HashMap<String, VerifiedFile>> {
        let mut archive = archive::open(&self.content)?;
        let mut files = HashMap::with_capacity(self.metadata.manifest.files.len());

        for entry in &self.metadata.manifest.files {
            let content = archive::read_entry(&mut archive, &entry.path)?;

            if content.len() as u64 != entry.size {
                return Err(Error::InvalidArchive(format!(
                    "entry {} is {} bytes, manifest says {}",
                    entry.path,
                    content.len(),
                    entry.size
                )));
            }
            if !checksum::matches(&content, &entry.hash) {
                return Err(Error::InvalidArchive(format!(
                    "entry {} does not match manifest digest {}",
                    entry.path,
                    checksum::encode(&entry.hash)
                )));
            }

            log::debug!("Verified {}", entry.path);
            files.insert(
                entry.path.clone(),
                VerifiedFile {
                    path: entry.path.clone(),
                    content,
                    mime_type: entry.mime_type.clone(),
                },
            );
        }

        Ok(files)
    }
}
