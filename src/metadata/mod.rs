//! Bundle data model and its JSON wire shape.
//!
//! The metadata served alongside a bundle looks like:
//!
//! ```json
//! {
//!   "version": "0.1.0",
//!   "created_at": "2024-01-01T00:00:00Z",
//!   "signature": "<base64 ed25519 signature>",
//!   "manifest": {
//!     "files": [
//!       { "path": "index.html", "size": 13, "hash": "<base64 blake3>", "mime_type": "text/html" }
//!     ]
//!   }
//! }
//! ```

mod bundle;

pub use bundle::{Bundle, VerifiedFile};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One regular file inside a bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Forward-slash path relative to the asset root.
    pub path: String,

    /// Size of the uncompressed content in bytes.
    pub size: u64,

    /// BLAKE3 digest of the uncompressed content.
    #[serde(with = "hash_serde")]
    pub hash: blake3::Hash,

    /// MIME type guessed from the file extension, if any.
    pub mime_type: Option<String>,
}

/// Ordered list of the files in a bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// File records, one per regular file under the asset root.
    pub files: Vec<FileEntry>,
}

impl Manifest {
    /// Looks up the entry for `path`.
    pub fn get(&self, path: &str) -> Option<&FileEntry> {
        self.files.iter().find(|entry| entry.path == path)
    }

    /// Sum of the uncompressed sizes of all entries.
    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|entry| entry.size).sum()
    }
}

/// Metadata describing a signed bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleMetadata {
    /// Release tag of the bundle format and contents.
    pub version: String,

    /// UTC time at which the bundle was signed.
    pub created_at: DateTime<Utc>,

    /// Base64 ed25519 signature over the raw container bytes.
    pub signature: String,

    /// Files contained in the bundle.
    pub manifest: Manifest,
}

impl BundleMetadata {
    /// Renders the metadata as indented JSON.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

mod hash_serde {
    use base64::{Engine, engine::general_purpose::STANDARD};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S>(hash: &blake3::Hash, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&STANDARD.encode(hash.as_bytes()))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<blake3::Hash, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        let bytes = STANDARD.decode(&encoded).map_err(D::Error::custom)?;
        let bytes: [u8; blake3::OUT_LEN] = bytes.as_slice().try_into().map_err(|_| {
            D::Error::custom(format!(
                "expected {} hash bytes, got {}",
                blake3::OUT_LEN,
                bytes.len()
            ))
        })?;
        Ok(blake3::Hash::from_bytes(bytes))
    }
}
