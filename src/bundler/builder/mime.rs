//! Extension-based MIME type lookup.
//!
//! Two layers: the platform table shipped with `mime_guess`, then a small
//! table of web-specific extensions the platform table does not know.

use std::path::Path;

/// Web extensions resolved when the platform table has no answer.
const WEB_OVERRIDES: &[(&str, &str)] = &[
    ("wasm", "application/wasm"),
    ("mjs", "application/javascript"),
    ("tsx", "application/typescript"),
    ("vue", "application/vue"),
    ("svelte", "application/svelte"),
    ("json5", "application/json5"),
    ("webmanifest", "application/manifest+json"),
];

/// Guesses the MIME type of `path` from its extension.
///
/// Parameter clauses such as `; charset=utf-8` are stripped. Returns `None`
/// for paths without an extension or with an extension neither table knows.
pub fn guess(path: &Path) -> Option<String> {
    let extension = path.extension()?.to_str()?;

    platform_lookup(path).or_else(|| override_lookup(extension))
}

fn platform_lookup(path: &Path) -> Option<String> {
    mime_guess::from_path(path)
        .first()
        .map(|mime| strip_parameters(mime.as_ref()).to_string())
}

fn override_lookup(extension: &str) -> Option<String> {
    WEB_OVERRIDES
        .iter()
        .find(|(ext, _)| ext.eq_ignore_ascii_case(extension))
        .map(|(_, mime)| (*mime).to_string())
}

fn strip_parameters(mime: &str) -> &str {
    mime.split(';').next().unwrap_or(mime).trim()
}
