//! Configuration structures for bundle construction.

mod builder;
mod core;

pub use builder::SettingsBuilder;
pub use self::core::{DEFAULT_MAX_BUNDLE_SIZE, Settings};
