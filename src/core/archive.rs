use crate::utils::error::{ImsccError, Result};
use std::io::{Cursor, Read};
use std::sync::Arc;
use zip::result::ZipError;
use zip::ZipArchive;

/// Read-only view over an in-memory zip package.
///
/// Cloning is cheap: the byte buffer and the parsed central directory are shared,
/// so each worker task can own a reader of its own.
#[derive(Debug, Clone)]
pub struct ArchiveReader {
    archive: ZipArchive<Cursor<Arc<[u8]>>>,
}

impl ArchiveReader {
    /// Indexes the archive. Corrupt, truncated or non-zip input fails with `ArchiveError`.
    pub fn open(bytes: impl Into<Arc<[u8]>>) -> Result<Self> {
        let archive = ZipArchive::new(Cursor::new(bytes.into()))?;
        tracing::debug!("Opened archive with {} entries", archive.len());
        Ok(Self { archive })
    }

    pub fn len(&self) -> usize {
        self.archive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archive.is_empty()
    }

    /// Entry paths in central directory order.
    pub fn list_entries(&self) -> Vec<String> {
        (0..self.archive.len())
            .filter_map(|i| self.archive.name_for_index(i))
            .map(str::to_string)
            .collect()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.archive.index_for_name(path).is_some()
    }

    /// Decoded text of an entry, `None` if the archive has no such entry.
    pub fn read_text(&mut self, path: &str) -> Result<Option<String>> {
        let mut entry = match self.archive.by_name(path) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut buf = Vec::new();
        entry
            .read_to_end(&mut buf)
            .map_err(|e| ImsccError::archive(format!("failed to read entry '{}': {}", path, e)))?;

        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }
}

#[cfg(test)]
pub(crate) fn build_archive(entries: &[(&str, &str)]) -> Vec<u8> {
    use std::io::Write;
    use zip::write::{SimpleFileOptions, ZipWriter};

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in entries {
        zip.start_file(*name, SimpleFileOptions::default()).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}
