//! Builder for constructing Settings.

use super::{DEFAULT_MAX_BUNDLE_SIZE, Settings};
use crate::bundler::signing::KeySources;
use std::path::{Path, PathBuf};

/// Builder for constructing [`Settings`].
///
/// # Examples
///
/// ```no_run
/// use webapp_bundler::bundler::{KeySources, SettingsBuilder};
///
/// # fn example() -> webapp_bundler::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .asset_root("dist")
///     .max_bundle_size(10 * 1024 * 1024)
///     .key_sources(KeySources {
///         secret: Some("shared between replicas".into()),
///         ..Default::default()
///     })
///     .key_file("/var/lib/webapp/signing.key")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
    asset_root: Option<PathBuf>,
    bundle_version: Option<String>,
    max_bundle_size: Option<u64>,
    key_sources: KeySources,
    key_file: Option<PathBuf>,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the directory to bundle.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn asset_root<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.asset_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the version tag written into the metadata.
    ///
    /// Default: this crate's version
    pub fn bundle_version<S: Into<String>>(mut self, version: S) -> Self {
        self.bundle_version = Some(version.into());
        self
    }

    /// Sets the largest container that will be signed.
    ///
    /// Default: [`DEFAULT_MAX_BUNDLE_SIZE`]
    pub fn max_bundle_size(mut self, bytes: u64) -> Self {
        self.max_bundle_size = Some(bytes);
        self
    }

    /// Sets the explicit signing key inputs.
    ///
    /// Default: none, which falls back to the key file or a generated key
    pub fn key_sources(mut self, sources: KeySources) -> Self {
        self.key_sources = sources;
        self
    }

    /// Overrides the key file location.
    ///
    /// Default: [`default_key_path`](crate::bundler::signing::default_key_path)
    pub fn key_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.key_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if `asset_root` is missing, the version is empty, or
    /// the size bound is zero.
    pub fn build(self) -> crate::bundler::Result<Settings> {
        use crate::bundler::error::Context;

        let bundle_version = self
            .bundle_version
            .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());
        if bundle_version.trim().is_empty() {
            crate::bail!("bundle_version must not be empty");
        }

        let max_bundle_size = self.max_bundle_size.unwrap_or(DEFAULT_MAX_BUNDLE_SIZE);
        if max_bundle_size == 0 {
            crate::bail!("max_bundle_size must be greater than zero");
        }

        Ok(Settings::new(
            self.asset_root.context("asset_root is required")?,
            bundle_version,
            max_bundle_size,
            self.key_sources,
            self.key_file,
        ))
    }
}
