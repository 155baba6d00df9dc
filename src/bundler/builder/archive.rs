//! ZIP container with independently zstd-compressed entries.
//!
//! Every entry is stored with ZIP compression method 93 (zstd), so a
//! consumer can decompress and check one entry without touching the rest.
//! Entry timestamps are pinned to the ZIP epoch so identical trees produce
//! identical bytes.

use std::io::{Cursor, Read, Write};

use zip::{CompressionMethod, DateTime, ZipArchive, ZipWriter, write::SimpleFileOptions};

use crate::bundler::{Error, Result, error::ArchiveExt};

/// ZIP method code registered for zstd.
pub const ZSTD_METHOD_CODE: u16 = 93;

/// In-memory container writer.
pub struct ContainerWriter {
    writer: ZipWriter<Cursor<Vec<u8>>>,
}

impl ContainerWriter {
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    /// Appends `content` as a new compressed entry named `path`.
    pub fn add_entry(&mut self, path: &str, content: &[u8]) -> Result<()> {
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Zstd)
            .last_modified_time(DateTime::default())
            .unix_permissions(0o644);

        self.writer
            .start_file(path, options)
            .archive_context(format_args!("starting entry {path}"))?;
        self.writer.write_all(content).map_err(|source| Error::Archive {
            context: format!("writing entry {path}"),
            source: source.into(),
        })?;

        Ok(())
    }

    /// Writes the central directory and returns the container bytes.
    pub fn finish(self) -> Result<Vec<u8>> {
        let cursor = self
            .writer
            .finish()
            .archive_context("finishing container")?;
        Ok(cursor.into_inner())
    }
}

impl Default for ContainerWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Opens `content` as a container.
pub fn open(content: &[u8]) -> Result<ZipArchive<Cursor<&[u8]>>> {
    ZipArchive::new(Cursor::new(content)).archive_context("reading container directory")
}

/// Decompresses the entry stored under `path`.
pub fn read_entry(archive: &mut ZipArchive<Cursor<&[u8]>>, path: &str) -> Result<Vec<u8>> {
    let mut file = archive
        .by_name(path)
        .archive_context(format_args!("locating entry {path}"))?;

    let mut content = Vec::with_capacity(usize::try_from(file.size()).unwrap_or(0));
    file.read_to_end(&mut content).map_err(|e| {
        Error::InvalidArchive(format!("failed to decompress entry {path}: {e}"))
    })?;

    Ok(content)
}

/// Structural sanity pass over a container.
///
/// Every entry must use method 93 and must decompress completely to its
/// recorded size (the reader checks the CRC on the way). Returns the number
/// of file entries.
pub fn validate(content: &[u8]) -> Result<usize> {
    let mut archive = open(content)?;
    let mut files = 0;

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .archive_context(format_args!("opening entry #{index}"))?;
        let name = entry.name().to_string();

        if entry.is_dir() {
            continue;
        }

        if entry.compression() != CompressionMethod::Zstd {
            return Err(Error::InvalidArchive(format!(
                "entry {name} uses compression {:?}, expected method {ZSTD_METHOD_CODE}",
                entry.compression()
            )));
        }

        let expected = entry.size();
        let actual = std::io::copy(&mut entry, &mut std::io::sink()).map_err(|e| {
            Error::InvalidArchive(format!("failed to decompress entry {name}: {e}"))
        })?;
        if actual != expected {
            return Err(Error::InvalidArchive(format!(
                "entry {name} decompressed to {actual} bytes, expected {expected}"
            )));
        }

        log::debug!("Validated entry {} ({} bytes)", name, actual);
        files += 1;
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::ErrorKind;

    fn container(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = ContainerWriter::new();
        for (path, content) in entries {
            writer.add_entry(path, content).unwrap();
        }
        writer.finish().unwrap()
    }

    #[test]
    fn entries_use_zstd_method() {
        let bytes = container(&[("a.txt", b"hello"), ("b/c.txt", b"world")]);
        let mut archive = open(&bytes).unwrap();
        for index in 0..archive.len() {
            let entry = archive.by_index(index).unwrap();
            assert_eq!(entry.compression(), CompressionMethod::Zstd);
        }
        assert_eq!(validate(&bytes).unwrap(), 2);
    }

    #[test]
    fn read_entry_returns_original_bytes() {
        let bytes = container(&[("nested/data.bin", &[0u8, 1, 2, 3, 255])]);
        let mut archive = open(&bytes).unwrap();
        assert_eq!(
            read_entry(&mut archive, "nested/data.bin").unwrap(),
            vec![0u8, 1, 2, 3, 255]
        );
        assert!(read_entry(&mut archive, "missing").is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        let err = validate(b"definitely not a zip file").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArchiveFailure);
    }

    #[test]
    fn truncated_container_is_rejected() {
        let bytes = container(&[("index.html", b"<html></html>")]);
        let err = validate(&bytes[..bytes.len() / 2]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArchiveFailure);
    }

    #[test]
    fn empty_container_is_valid() {
        let bytes = container(&[]);
        assert_eq!(validate(&bytes).unwrap(), 0);
    }
}
