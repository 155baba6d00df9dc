//! Key file persistence.
//!
//! The key file holds base64 of the 64-byte private key and is readable by
//! the owner only.

use std::path::Path;

use super::keypair::{KeyPair, PRIVATE_KEY_LENGTH, decode_exact};
use crate::bundler::{Result, utils::fs};

/// Loads a keypair from `path`, or `None` if no file exists there.
///
/// # Errors
///
/// Fails if the file cannot be read, is not base64, or does not decode to
/// exactly 64 bytes.
pub fn load(path: &Path) -> Result<Option<KeyPair>> {
    let Some(contents) = fs::read_optional_string(path)? else {
        log::debug!("No key file at {}", path.display());
        return Ok(None);
    };

    let bytes = decode_exact::<PRIVATE_KEY_LENGTH>(&contents, "key file")?;
    KeyPair::from_private_key(&bytes, "key file").map(Some)
}

/// Writes `keypair` to `path`, replacing any existing file.
pub fn save(keypair: &KeyPair, path: &Path) -> Result<()> {
    fs::write_private_file(path, keypair.private_key_base64().as_bytes())
}

/// Persists a freshly generated key.
///
/// Failure does not abort startup, but losing this key invalidates every
/// bundle signed with it once the process restarts. On failure the key and
/// its intended location go to the error log and to stderr so an operator
/// can store it by hand.
pub fn persist_generated(keypair: &KeyPair, path: &Path) {
    match save(keypair, path) {
        Ok(()) => {
            log::info!("Generated new signing key, saved to {}", path.display());
        }
        Err(e) => {
            let private_key = keypair.private_key_base64();
            log::error!(
                "Failed to save generated signing key to {}: {}. \
                 Store this key manually or bundles signed with it will fail verification after restart. \
                 Private key (base64): {}",
                path.display(),
                e,
                private_key
            );
            eprintln!(
                "CRITICAL: generated signing key could not be saved to {}: {}\n\
                 Save the following private key (base64) to that path, or pass it via BUNDLE_SIGNING_KEY:\n\
                 {}",
                path.display(),
                e,
                private_key
            );
        }
    }
}
