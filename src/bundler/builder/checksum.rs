//! Per-file content digests.
//!
//! Files are addressed by the BLAKE3 hash of their raw bytes. The digest is
//! computed before compression, so it survives a decompress round-trip.

use base64::{Engine, engine::general_purpose::STANDARD};

/// Computes the content digest of `content`.
pub fn digest(content: &[u8]) -> blake3::Hash {
    blake3::hash(content)
}

/// Base64 text form of a digest, as it appears in the manifest.
pub fn encode(hash: &blake3::Hash) -> String {
    STANDARD.encode(hash.as_bytes())
}

/// Returns `true` when `content` hashes to `expected`.
///
/// Comparison goes through `blake3::Hash`'s constant-time equality.
pub fn matches(content: &[u8], expected: &blake3::Hash) -> bool {
    digest(content) == *expected
}
