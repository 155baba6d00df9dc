//! Bundle construction, signing key resolution and signing.
//!
//! # Overview
//!
//! At startup:
//! 1. [`signing::resolve`] picks the signing key
//! 2. [`BundleBuilder`] packs the asset root into a container
//! 3. [`BundleManager`] checks the size bound, validates and signs the
//!    container, then holds the frozen [`Bundle`](crate::metadata::Bundle)
//!
//! # Example
//!
//! ```no_run
//! use webapp_bundler::bundler::{BundleManager, SettingsBuilder};
//!
//! # fn example() -> webapp_bundler::bundler::Result<()> {
//! let settings = SettingsBuilder::new().asset_root("dist").build()?;
//! let manager = BundleManager::from_settings(&settings)?;
//!
//! let bundle = manager.bundle();
//! println!("{} files", bundle.metadata().manifest.files.len());
//! println!("verifying key: {}", manager.verifying_key_base64());
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod error;
mod manager;
pub mod settings;
pub mod signing;
pub mod utils;

pub use builder::BundleBuilder;
pub use error::{Error, ErrorKind, Result};
pub use manager::BundleManager;
pub use settings::{Settings, SettingsBuilder};
pub use signing::{KeyPair, KeySource, KeySources};
