//! File system utilities for key persistence.
//!
//! Key files are written atomically (temporary file in the target directory,
//! then rename) and are readable by the owning user only.

use crate::bundler::error::{Error, ErrorExt, Result};
use std::{io::Write, path::Path};

/// Creates `path` and its parents. New directories are owner-only on unix.
pub fn create_private_dir_all(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        std::fs::DirBuilder::new()
            .recursive(true)
            .mode(0o700)
            .create(path)
            .fs_context("failed to create directory", path)
    }
    #[cfg(not(unix))]
    {
        std::fs::create_dir_all(path).fs_context("failed to create directory", path)
    }
}

/// Atomically replaces `path` with `contents`, mode 0600 on unix.
///
/// Parent directories are created as needed.
pub fn write_private_file(path: &Path, contents: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    create_private_dir_all(parent)?;

    // NamedTempFile is created with mode 0600 on unix
    let mut file = tempfile::NamedTempFile::new_in(parent)
        .fs_context("failed to create temporary file in", parent)?;
    file.write_all(contents)
        .fs_context("failed to write", file.path().to_path_buf())?;
    file.as_file()
        .sync_all()
        .fs_context("failed to sync", file.path().to_path_buf())?;

    file.persist(path)
        .map_err(|e| e.error)
        .fs_context("failed to persist", path)?;

    Ok(())
}

/// Reads a small text file, returning `None` if nothing exists at `path`.
///
/// A path below a regular file also counts as absent. Any other failure,
/// such as a permission error, is returned.
pub fn read_optional_string(path: &Path) -> Result<Option<String>> {
    use std::io::ErrorKind;

    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => Ok(None),
        Err(source) => Err(Error::Io {
            context: "failed to read".to_string(),
            path: path.to_path_buf(),
            source,
        }),
    }
}
