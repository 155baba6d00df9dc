//! Core Settings struct and implementations.

use crate::bundler::signing::{KeySources, default_key_path};
use std::path::{Path, PathBuf};

/// Default upper bound on the container size: 50 MiB.
pub const DEFAULT_MAX_BUNDLE_SIZE: u64 = 50 * 1024 * 1024;

/// Main settings for bundle construction.
///
/// Constructed via [`SettingsBuilder`](super::SettingsBuilder).
///
/// # Examples
///
/// ```no_run
/// use webapp_bundler::bundler::SettingsBuilder;
///
/// # fn example() -> webapp_bundler::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .asset_root("dist")
///     .bundle_version("1.4.0")
///     .build()?;
/// assert_eq!(settings.bundle_version(), "1.4.0");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Settings {
    /// Directory whose regular files go into the bundle.
    asset_root: PathBuf,

    /// Version tag written into the bundle metadata.
    bundle_version: String,

    /// Largest container that will be signed, in bytes.
    max_bundle_size: u64,

    /// Explicit signing key inputs.
    key_sources: KeySources,

    /// Key file override.
    ///
    /// None means the platform default location.
    key_file: Option<PathBuf>,
}

impl Settings {
    pub(super) fn new(
        asset_root: PathBuf,
        bundle_version: String,
        max_bundle_size: u64,
        key_sources: KeySources,
        key_file: Option<PathBuf>,
    ) -> Self {
        Self {
            asset_root,
            bundle_version,
            max_bundle_size,
            key_sources,
            key_file,
        }
    }

    /// Returns the asset root directory.
    pub fn asset_root(&self) -> &Path {
        &self.asset_root
    }

    /// Returns the bundle version tag.
    pub fn bundle_version(&self) -> &str {
        &self.bundle_version
    }

    /// Returns the maximum container size in bytes.
    pub fn max_bundle_size(&self) -> u64 {
        self.max_bundle_size
    }

    /// Returns the explicit key inputs.
    pub fn key_sources(&self) -> &KeySources {
        &self.key_sources
    }

    /// Returns where the key file is read from and written to.
    pub fn key_file_path(&self) -> PathBuf {
        self.key_file.clone().unwrap_or_else(default_key_path)
    }
}
