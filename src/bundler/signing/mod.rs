//! Signing key lifecycle.
//!
//! - [`keypair`] - the ed25519 [`KeyPair`] and key encodings
//! - [`resolver`] - ordered resolution across explicit, file and generated sources
//! - [`store`] - key file load and atomic, owner-only persistence

pub mod keypair;
pub mod resolver;
pub mod store;

pub use keypair::{KeyPair, PRIVATE_KEY_LENGTH, SEED_LENGTH};
pub use resolver::{KeySource, KeySources, ResolvedKey, default_key_path, resolve};
