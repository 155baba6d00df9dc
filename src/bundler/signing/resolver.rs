//! Ordered signing key resolution.
//!
//! Candidate sources are tried in a fixed order and the first one that
//! yields a key wins:
//!
//! 1. explicit 64-byte private key (base64)
//! 2. explicit 32-byte seed (base64)
//! 3. shared secret of any length, hashed with SHA-256 into a seed
//! 4. previously persisted key file
//! 5. freshly generated key, persisted to the key file location
//!
//! Malformed explicit values (1-2) abort resolution. A key file with
//! malformed contents (4) only disqualifies that source and is replaced by
//! the generated key. A key file that exists but cannot be read aborts
//! resolution so it is never overwritten.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use super::{
    keypair::{KeyPair, PRIVATE_KEY_LENGTH, SEED_LENGTH, decode_exact},
    store,
};
use crate::{
    bail,
    bundler::{ErrorKind, Result},
};

/// Explicit key inputs, usually taken from the environment.
#[derive(Clone, Default)]
pub struct KeySources {
    /// Base64 of the 64-byte private key.
    pub private_key: Option<String>,
    /// Base64 of a 32-byte seed.
    pub seed: Option<String>,
    /// Shared secret string, any length.
    pub secret: Option<String>,
}

impl std::fmt::Debug for KeySources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |value: &Option<String>| value.as_ref().map(|_| "<redacted>");
        f.debug_struct("KeySources")
            .field("private_key", &redact(&self.private_key))
            .field("seed", &redact(&self.seed))
            .field("secret", &redact(&self.secret))
            .finish()
    }
}

/// Where a resolved key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    PrivateKey,
    Seed,
    SharedSecret,
    KeyFile,
    Generated,
}

impl std::fmt::Display for KeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::PrivateKey => "explicit private key",
            Self::Seed => "explicit seed",
            Self::SharedSecret => "shared secret",
            Self::KeyFile => "key file",
            Self::Generated => "generated key",
        })
    }
}

/// A keypair together with the source that produced it.
#[derive(Debug, Clone)]
pub struct ResolvedKey {
    pub keypair: KeyPair,
    pub source: KeySource,
}

/// Inputs every resolver sees.
struct Candidates<'a> {
    sources: &'a KeySources,
    key_path: &'a Path,
}

/// `Ok(None)` passes to the next resolver, `Err` aborts resolution.
type Resolver = fn(&Candidates<'_>) -> Result<Option<KeyPair>>;

const RESOLVERS: [(KeySource, Resolver); 5] = [
    (KeySource::PrivateKey, from_private_key),
    (KeySource::Seed, from_seed),
    (KeySource::SharedSecret, from_shared_secret),
    (KeySource::KeyFile, from_key_file),
    (KeySource::Generated, generate_and_persist),
];

/// Resolves the signing keypair.
///
/// `key_path` is where a key file is looked up and where a generated key is
/// persisted. The verifying key of the result is logged; the private key is
/// not.
///
/// # Errors
///
/// Returns an encoding error when an explicit private key or seed is not
/// valid base64 or has the wrong decoded length, and an IO error when the
/// key file exists but cannot be read.
pub fn resolve(sources: &KeySources, key_path: &Path) -> Result<ResolvedKey> {
    let candidates = Candidates { sources, key_path };

    for (source, resolver) in RESOLVERS {
        log::debug!("Trying signing key source: {}", source);
        if let Some(keypair) = resolver(&candidates)? {
            log::info!(
                "Using signing key from {}; verifying key: {}",
                source,
                keypair.verifying_key_base64()
            );
            return Ok(ResolvedKey { keypair, source });
        }
    }

    bail!("no signing key source produced a key")
}

/// Default key file location: the platform data dir, else the working directory.
pub fn default_key_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("webapp-bundler"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("signing.key")
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn from_private_key(candidates: &Candidates<'_>) -> Result<Option<KeyPair>> {
    let Some(encoded) = non_empty(&candidates.sources.private_key) else {
        return Ok(None);
    };
    let bytes = decode_exact::<PRIVATE_KEY_LENGTH>(encoded, "signing key")?;
    KeyPair::from_private_key(&bytes, "signing key").map(Some)
}

fn from_seed(candidates: &Candidates<'_>) -> Result<Option<KeyPair>> {
    let Some(encoded) = non_empty(&candidates.sources.seed) else {
        return Ok(None);
    };
    let seed = decode_exact::<SEED_LENGTH>(encoded, "signing seed")?;
    Ok(Some(KeyPair::from_seed(&seed)))
}

fn from_shared_secret(candidates: &Candidates<'_>) -> Result<Option<KeyPair>> {
    let Some(secret) = candidates.sources.secret.as_deref().filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    let seed: [u8; SEED_LENGTH] = Sha256::digest(secret.as_bytes()).into();
    Ok(Some(KeyPair::from_seed(&seed)))
}

fn from_key_file(candidates: &Candidates<'_>) -> Result<Option<KeyPair>> {
    match store::load(candidates.key_path) {
        Ok(keypair) => Ok(keypair),
        Err(e) if e.kind() == ErrorKind::EncodingFailure => {
            log::warn!(
                "Ignoring malformed key file {}: {}",
                candidates.key_path.display(),
                e
            );
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn generate_and_persist(candidates: &Candidates<'_>) -> Result<Option<KeyPair>> {
    let keypair = KeyPair::generate();
    store::persist_generated(&keypair, candidates.key_path);
    Ok(Some(keypair))
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{Engine, engine::general_purpose::STANDARD};

    fn key_path(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("keys").join("signing.key")
    }

    #[test]
    fn explicit_private_key_wins() {
        let dir = tempfile::tempdir().unwrap();
        let expected = KeyPair::generate();
        let sources = KeySources {
            private_key: Some(expected.private_key_base64()),
            seed: Some(STANDARD.encode([9u8; 32])),
            secret: Some("shared".to_string()),
        };

        let resolved = resolve(&sources, &key_path(&dir)).unwrap();
        assert_eq!(resolved.source, KeySource::PrivateKey);
        assert_eq!(resolved.keypair.verifying_key(), expected.verifying_key());
        assert!(!key_path(&dir).exists());
    }

    #[test]
    fn malformed_private_key_does_not_fall_through() {
        let dir = tempfile::tempdir().unwrap();
        let sources = KeySources {
            private_key: Some(STANDARD.encode([1u8; 32])),
            secret: Some("shared".to_string()),
            ..Default::default()
        };

        let err = resolve(&sources, &key_path(&dir)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EncodingFailure);
        assert!(err.to_string().contains("expected 64 bytes, got 32"));
        assert!(!key_path(&dir).exists());
    }

    #[test]
    fn malformed_seed_does_not_fall_through() {
        let dir = tempfile::tempdir().unwrap();
        let sources = KeySources {
            seed: Some("not base64!".to_string()),
            secret: Some("shared".to_string()),
            ..Default::default()
        };

        let err = resolve(&sources, &key_path(&dir)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EncodingFailure);
    }

    #[test]
    fn seed_expands_deterministically() {
        let dir = tempfile::tempdir().unwrap();
        let sources = KeySources {
            seed: Some(STANDARD.encode([5u8; 32])),
            ..Default::default()
        };

        let resolved = resolve(&sources, &key_path(&dir)).unwrap();
        assert_eq!(resolved.source, KeySource::Seed);
        assert_eq!(
            resolved.keypair.verifying_key(),
            KeyPair::from_seed(&[5u8; 32]).verifying_key()
        );
    }

    #[test]
    fn shared_secret_yields_identical_keys() {
        let dir_a = tempfile::tempdir().unwrap();
        let dir_b = tempfile::tempdir().unwrap();
        let sources = KeySources {
            secret: Some("replicas share this".to_string()),
            ..Default::default()
        };

        let a = resolve(&sources, &key_path(&dir_a)).unwrap();
        let b = resolve(&sources, &key_path(&dir_b)).unwrap();

        assert_eq!(a.source, KeySource::SharedSecret);
        assert_eq!(a.keypair.verifying_key(), b.keypair.verifying_key());

        let other = KeySources {
            secret: Some("a different secret".to_string()),
            ..Default::default()
        };
        let c = resolve(&other, &key_path(&dir_a)).unwrap();
        assert_ne!(a.keypair.verifying_key(), c.keypair.verifying_key());
    }

    #[test]
    fn blank_values_are_treated_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let sources = KeySources {
            private_key: Some("   ".to_string()),
            seed: Some(String::new()),
            secret: Some("s".to_string()),
        };

        let resolved = resolve(&sources, &key_path(&dir)).unwrap();
        assert_eq!(resolved.source, KeySource::SharedSecret);
    }

    #[test]
    fn generated_key_is_persisted_and_reloaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = key_path(&dir);

        let first = resolve(&KeySources::default(), &path).unwrap();
        assert_eq!(first.source, KeySource::Generated);
        assert!(path.exists());

        let second = resolve(&KeySources::default(), &path).unwrap();
        assert_eq!(second.source, KeySource::KeyFile);
        assert_eq!(first.keypair.verifying_key(), second.keypair.verifying_key());
    }

    #[test]
    fn bad_key_file_falls_through_to_generation() {
        let dir = tempfile::tempdir().unwrap();
        let path = key_path(&dir);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, STANDARD.encode([3u8; 10])).unwrap();

        let resolved = resolve(&KeySources::default(), &path).unwrap();
        assert_eq!(resolved.source, KeySource::Generated);

        let reloaded = resolve(&KeySources::default(), &path).unwrap();
        assert_eq!(reloaded.source, KeySource::KeyFile);
        assert_eq!(
            reloaded.keypair.verifying_key(),
            resolved.keypair.verifying_key()
        );
    }

    #[test]
    fn unreadable_key_file_is_not_replaced() {
        let dir = tempfile::tempdir().unwrap();
        // a directory at the key path exists but cannot be read as a file
        let path = key_path(&dir);
        std::fs::create_dir_all(&path).unwrap();
        std::fs::write(path.join("keep"), b"operator data").unwrap();

        let err = resolve(&KeySources::default(), &path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IoFailure);
        assert!(err.to_string().contains("signing.key"));
        assert_eq!(std::fs::read(path.join("keep")).unwrap(), b"operator data");
    }

    #[cfg(unix)]
    #[test]
    fn key_file_is_left_alone_when_reading_fails() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = key_path(&dir);
        let original = KeyPair::generate();
        store::save(&original, &path).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o000)).unwrap();

        // root ignores file modes, in which case the key simply loads
        match resolve(&KeySources::default(), &path) {
            Ok(resolved) => {
                assert_eq!(resolved.source, KeySource::KeyFile);
                assert_eq!(resolved.keypair.verifying_key(), original.verifying_key());
            }
            Err(err) => assert_eq!(err.kind(), ErrorKind::IoFailure),
        }

        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600)).unwrap();
        let reloaded = store::load(&path).unwrap().unwrap();
        assert_eq!(reloaded.verifying_key(), original.verifying_key());
    }

    #[test]
    fn debug_redacts_sources() {
        let sources = KeySources {
            secret: Some("hunter2".to_string()),
            ..Default::default()
        };
        let debug = format!("{sources:?}");
        assert!(!debug.contains("hunter2"));
    }
}
