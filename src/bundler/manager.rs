//! Validation, signing and publication of the bundle.
//!
//! A [`BundleManager`] is constructed once at startup. Construction checks
//! the size bound, validates the container structure, signs the raw bytes and
//! freezes the result. Readers get [`Arc`] snapshots of the [`Bundle`], so a
//! future rebuild can publish a whole new snapshot without touching the one
//! readers already hold.

use std::sync::Arc;

use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Utc;
use ed25519_dalek::VerifyingKey;

use crate::{
    bundler::{
        Error, Result, Settings,
        builder::{self, archive},
        signing::{self, KeyPair},
    },
    metadata::{Bundle, BundleMetadata, FileEntry, Manifest},
};

/// Holds the signed, immutable bundle and the key that signed it.
///
/// The signing key stays inside the manager; only the verifying key is
/// exposed.
pub struct BundleManager {
    bundle: Arc<Bundle>,
    keypair: KeyPair,
}

impl std::fmt::Debug for BundleManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BundleManager")
            .field("version", &self.bundle.metadata().version)
            .field("files", &self.bundle.metadata().manifest.files.len())
            .field("size", &self.bundle.content().len())
            .field("verifying_key", &self.keypair.verifying_key_base64())
            .finish()
    }
}

impl BundleManager {
    /// Validates and signs `content`.
    ///
    /// # Errors
    ///
    /// - [`Error::SizeExceeded`] if `content` is larger than `max_size`;
    ///   nothing is signed in that case
    /// - an archive error if `content` is not a well-formed container
    pub fn new(
        content: Vec<u8>,
        files: Vec<FileEntry>,
        keypair: KeyPair,
        max_size: u64,
        version: impl Into<String>,
    ) -> Result<Self> {
        let size = content.len() as u64;
        if size > max_size {
            return Err(Error::SizeExceeded {
                size,
                max: max_size,
            });
        }

        let entries = archive::validate(&content)?;
        log::debug!("Container holds {} valid entries", entries);

        let signature = keypair.sign(&content);

        let metadata = BundleMetadata {
            version: version.into(),
            created_at: Utc::now(),
            signature: STANDARD.encode(signature.to_bytes()),
            manifest: Manifest { files },
        };

        log::info!(
            "Signed bundle {} ({} files, {} bytes)",
            metadata.version,
            metadata.manifest.files.len(),
            size
        );

        Ok(Self {
            bundle: Arc::new(Bundle::from_parts(metadata, content)),
            keypair,
        })
    }

    /// Runs the whole startup pipeline: resolve the key, build the
    /// container from the asset root, then validate and sign it.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let resolved = signing::resolve(settings.key_sources(), &settings.key_file_path())?;
        let (content, files) = builder::build(settings.asset_root())?;

        Self::new(
            content,
            files,
            resolved.keypair,
            settings.max_bundle_size(),
            settings.bundle_version(),
        )
    }

    /// Returns a snapshot of the signed bundle.
    pub fn bundle(&self) -> Arc<Bundle> {
        Arc::clone(&self.bundle)
    }

    /// Returns the bundle metadata.
    pub fn metadata(&self) -> &BundleMetadata {
        self.bundle.metadata()
    }

    /// Returns the public key that verifies the bundle signature.
    pub fn verifying_key(&self) -> VerifyingKey {
        self.keypair.verifying_key()
    }

    /// Returns the raw 32 verifying key bytes.
    pub fn verifying_key_bytes(&self) -> [u8; 32] {
        self.verifying_key().to_bytes()
    }

    /// Returns the verifying key as base64.
    pub fn verifying_key_base64(&self) -> String {
        self.keypair.verifying_key_base64()
    }
}
