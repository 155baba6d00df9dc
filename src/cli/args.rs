//! Command line argument parsing and validation.
//!
//! Every option can also be supplied through the environment, which is how
//! signing key material is normally passed in.

use clap::Parser;
use std::path::PathBuf;

use crate::bundler::{KeySources, Settings, SettingsBuilder, settings::DEFAULT_MAX_BUNDLE_SIZE};

/// Signed static asset bundler
#[derive(Parser)]
#[command(
    name = "webapp-bundler",
    version,
    about = "Packs a static asset directory into a signed bundle",
    long_about = "Packs every file under the input directory into a ZIP container with
zstd-compressed entries, hashes each file with BLAKE3 and signs the container with ed25519.

The signing key is taken from the first available source:
  1. --signing-key / BUNDLE_SIGNING_KEY      base64, exactly 64 bytes
  2. --signing-seed / BUNDLE_SIGNING_SEED    base64, exactly 32 bytes
  3. --signing-secret / BUNDLE_SIGNING_SECRET any length, hashed into a seed
  4. the key file (--key-file / BUNDLE_SIGNING_KEY_PATH, or the platform data dir)
  5. a freshly generated key, saved to the key file

Usage:
  webapp-bundler --input dist --output bundle.zip --manifest bundle.json"
)]
pub struct Args {
    /// Directory to bundle
    #[arg(short, long, env = "BUNDLE_INPUT", value_name = "DIR")]
    pub input: PathBuf,

    /// Where to write the bundle container
    #[arg(short, long, env = "BUNDLE_OUTPUT", value_name = "PATH")]
    pub output: PathBuf,

    /// Where to write the bundle metadata as JSON (optional)
    #[arg(short, long, env = "BUNDLE_MANIFEST", value_name = "PATH")]
    pub manifest: Option<PathBuf>,

    /// Version tag for the bundle (defaults to the tool version)
    #[arg(long = "bundle-version", env = "BUNDLE_VERSION", value_name = "VERSION")]
    pub bundle_version: Option<String>,

    /// Largest container that will be signed, in bytes
    #[arg(
        long,
        env = "BUNDLE_MAX_SIZE",
        value_name = "BYTES",
        default_value_t = DEFAULT_MAX_BUNDLE_SIZE
    )]
    pub max_size: u64,

    /// Base64 of the 64-byte ed25519 private key
    #[arg(long, env = "BUNDLE_SIGNING_KEY", value_name = "BASE64", hide_env_values = true)]
    pub signing_key: Option<String>,

    /// Base64 of a 32-byte ed25519 seed
    #[arg(long, env = "BUNDLE_SIGNING_SEED", value_name = "BASE64", hide_env_values = true)]
    pub signing_seed: Option<String>,

    /// Shared secret that replicas derive the same key from
    #[arg(long, env = "BUNDLE_SIGNING_SECRET", value_name = "SECRET", hide_env_values = true)]
    pub signing_secret: Option<String>,

    /// Key file to load, or to save a generated key to
    #[arg(long, env = "BUNDLE_SIGNING_KEY_PATH", value_name = "PATH")]
    pub key_file: Option<PathBuf>,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.max_size == 0 {
            return Err("--max-size must be greater than zero".to_string());
        }

        if self.output.is_dir() {
            return Err(format!(
                "Output path is a directory: {}",
                self.output.display()
            ));
        }

        if self.manifest.as_ref() == Some(&self.output) {
            return Err("--manifest and --output must be different paths".to_string());
        }

        Ok(())
    }

    /// Builds bundler settings from the arguments.
    pub fn to_settings(&self) -> crate::bundler::Result<Settings> {
        let mut builder = SettingsBuilder::new()
            .asset_root(&self.input)
            .max_bundle_size(self.max_size)
            .key_sources(KeySources {
                private_key: self.signing_key.clone(),
                seed: self.signing_seed.clone(),
                secret: self.signing_secret.clone(),
            });

        if let Some(version) = &self.bundle_version {
            builder = builder.bundle_version(version.as_str());
        }
        if let Some(key_file) = &self.key_file {
            builder = builder.key_file(key_file);
        }

        builder.build()
    }
}
