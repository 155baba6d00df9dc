//! Ed25519 signing keypair.

use base64::{Engine, engine::general_purpose::STANDARD};
use ed25519_dalek::{
    KEYPAIR_LENGTH, SECRET_KEY_LENGTH, Signature, Signer, SigningKey, Verifier, VerifyingKey,
};

use crate::bundler::{Error, Result};

/// Length of a full private key: the 32-byte secret followed by the 32-byte public key.
pub const PRIVATE_KEY_LENGTH: usize = KEYPAIR_LENGTH;

/// Length of a seed that expands into a full keypair.
pub const SEED_LENGTH: usize = SECRET_KEY_LENGTH;

/// Signing keypair used for bundles.
///
/// The private half never leaves this type except through
/// [`KeyPair::private_key_base64`], which exists solely for key file
/// persistence. `Debug` prints only the verifying key.
#[derive(Clone)]
pub struct KeyPair {
    signing_key: SigningKey,
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("verifying_key", &self.verifying_key_base64())
            .field("signing_key", &"<redacted>")
            .finish()
    }
}

impl KeyPair {
    /// Creates a keypair from a 32-byte seed.
    pub fn from_seed(seed: &[u8; SEED_LENGTH]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Creates a keypair from the 64-byte secret ‖ public encoding.
    ///
    /// Fails if the public half does not belong to the secret half.
    pub fn from_private_key(
        bytes: &[u8; PRIVATE_KEY_LENGTH],
        source_name: &'static str,
    ) -> Result<Self> {
        let signing_key =
            SigningKey::from_keypair_bytes(bytes).map_err(|e| Error::EncodingFailure {
                source_name,
                reason: format!("public half does not match private half ({e})"),
            })?;
        Ok(Self { signing_key })
    }

    /// Generates a fresh random keypair from the OS RNG.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut rand::rngs::OsRng),
        }
    }

    /// Public verifying key.
    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }

    /// Verifying key bytes, base64 encoded.
    pub fn verifying_key_base64(&self) -> String {
        STANDARD.encode(self.verifying_key().as_bytes())
    }

    /// Signs `message`, returning a detached signature.
    pub fn sign(&self, message: &[u8]) -> Signature {
        self.signing_key.sign(message)
    }

    /// Checks a detached signature against the verifying key.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> Result<()> {
        Ok(self.verifying_key().verify(message, signature)?)
    }

    /// Base64 of the 64-byte private key, the key file format.
    pub(crate) fn private_key_base64(&self) -> String {
        STANDARD.encode(self.signing_key.to_keypair_bytes())
    }
}

/// Decodes base64 key material and checks its length.
pub(crate) fn decode_exact<const N: usize>(
    encoded: &str,
    source_name: &'static str,
) -> Result<[u8; N]> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| Error::EncodingFailure {
            source_name,
            reason: format!("not valid base64 ({e})"),
        })?;

    let actual = bytes.len();
    bytes.try_into().map_err(|_| Error::InvalidKeyLength {
        source_name,
        expected: N,
        actual,
    })
}
