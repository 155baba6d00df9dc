//! Asset tree walking and container assembly.

use std::path::{Component, Path};

use crate::{
    bail,
    bundler::{Error, Result, error::ErrorExt},
    metadata::FileEntry,
};

use super::{archive::ContainerWriter, checksum, mime};

/// Builds a container and manifest entries from an asset directory.
///
/// Directories are walked recursively; only regular files are recorded,
/// symlinks are not followed. Entries are sorted by path so the same tree
/// always yields the same manifest order.
///
/// # Examples
///
/// ```no_run
/// use webapp_bundler::bundler::BundleBuilder;
///
/// # fn example() -> webapp_bundler::bundler::Result<()> {
/// let (content, files) = BundleBuilder::new("dist")?.finish()?;
/// println!("{} files, {} bytes", files.len(), content.len());
/// # Ok(())
/// # }
/// ```
pub struct BundleBuilder {
    writer: ContainerWriter,
    files: Vec<FileEntry>,
}

impl std::fmt::Debug for BundleBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BundleBuilder")
            .field("files", &self.files.len())
            .finish_non_exhaustive()
    }
}

impl BundleBuilder {
    /// Walks `root` and writes every regular file into a new container.
    ///
    /// # Errors
    ///
    /// - [`Error::PathNotFound`] if `root` does not exist
    /// - an IO error if `root` is not a directory
    /// - an IO error if a directory or file cannot be read
    /// - an archive error if an entry cannot be written
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref();

        if !root.exists() {
            return Err(Error::PathNotFound {
                path: root.to_path_buf(),
            });
        }
        if !root.is_dir() {
            return Err(Error::Io {
                context: "asset root is not a directory".to_string(),
                path: root.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::NotADirectory),
            });
        }

        let mut sources = Vec::new();
        for entry in walkdir::WalkDir::new(root).follow_links(false) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative_path = relative_path(root, entry.path())?;
            sources.push((relative_path, entry.into_path()));
        }

        sources.sort_by(|(a, _), (b, _)| a.cmp(b));

        let mut builder = Self {
            writer: ContainerWriter::new(),
            files: Vec::with_capacity(sources.len()),
        };

        for (relative_path, path) in sources {
            let content = std::fs::read(&path).fs_context("failed to read asset", &path)?;

            builder.writer.add_entry(&relative_path, &content)?;

            let entry = FileEntry {
                hash: checksum::digest(&content),
                size: content.len() as u64,
                mime_type: mime::guess(&path),
                path: relative_path,
            };
            log::debug!(
                "Added {} ({} bytes, {})",
                entry.path,
                entry.size,
                entry.mime_type.as_deref().unwrap_or("unknown type")
            );
            builder.files.push(entry);
        }

        log::info!(
            "Collected {} files from {}",
            builder.files.len(),
            root.display()
        );

        Ok(builder)
    }

    /// Finishes the container, returning its bytes and the file records.
    pub fn finish(self) -> Result<(Vec<u8>, Vec<FileEntry>)> {
        let content = self.writer.finish()?;
        log::info!("Container size: {} bytes", content.len());
        Ok((content, self.files))
    }
}

/// Builds a container from `root` in one call.
pub fn build<P: AsRef<Path>>(root: P) -> Result<(Vec<u8>, Vec<FileEntry>)> {
    BundleBuilder::new(root)?.finish()
}

/// Forward-slash path of `path` relative to `root`.
fn relative_path(root: &Path, path: &Path) -> Result<String> {
    let Ok(relative) = path.strip_prefix(root) else {
        bail!("{} is not inside {}", path.display(), root.display());
    };

    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => match part.to_str() {
                Some(part) => parts.push(part),
                None => bail!("asset path is not valid UTF-8: {}", path.display()),
            },
            Component::CurDir => {}
            _ => bail!("unexpected component in asset path: {}", path.display()),
        }
    }

    if parts.is_empty() {
        bail!("asset path {} has no name below the root", path.display());
    }

    Ok(parts.join("/"))
}
