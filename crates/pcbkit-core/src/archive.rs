//! Zip archive access
//!
//! Opens an in-memory zip once to list its file entries. Entry contents
//! are decompressed lazily on a blocking worker and their normalised text
//! is cached, so reading the same entry twice costs one decompression.

use std::io::{Cursor, Read};
use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, warn};
use zip::ZipArchive;

use crate::error::{Error, Result};
use crate::text::normalize_text;

#[derive(Debug, Clone)]
enum EntrySource {
    Zip { data: Arc<[u8]>, index: usize },
    Memory(Arc<[u8]>),
}

/// One file inside a board archive.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    path: String,
    source: EntrySource,
    text: Arc<OnceCell<String>>,
}

impl ArchiveEntry {
    fn new(path: String, source: EntrySource) -> Self {
        Self {
            path,
            source,
            text: Arc::new(OnceCell::new()),
        }
    }

    /// Build an entry from contents the caller already holds.
    pub fn from_text(path: impl Into<String>, text: impl Into<String>) -> Self {
        let bytes: Vec<u8> = text.into().into_bytes();
        Self::from_bytes(path, bytes)
    }

    pub fn from_bytes(path: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self::new(
            normalize_path(&path.into()),
            EntrySource::Memory(bytes.into()),
        )
    }

    /// Forward-slash path inside the archive.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Final path component.
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Lowercased extension of the file name, if it has one.
    pub fn extension(&self) -> Option<String> {
        let name = self.file_name();
        let (stem, ext) = name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }

    /// Raw entry bytes.
    pub async fn read_bytes(&self) -> Result<Vec<u8>> {
        match &self.source {
            EntrySource::Memory(bytes) => Ok(bytes.to_vec()),
            EntrySource::Zip { data, index } => {
                let data = Arc::clone(data);
                let index = *index;
                let read = tokio::task::spawn_blocking(move || read_zip_entry(data, index)).await?;
                read.map_err(|reason| Error::Entry {
                    path: self.path.clone(),
                    reason,
                })
            }
        }
    }

    /// Entry contents decoded as UTF-8 (lossily) and normalised.
    ///
    /// The first successful call caches the text; later calls return the
    /// cached value.
    pub async fn read_text(&self) -> Result<&str> {
        let text = self
            .text
            .get_or_try_init(|| async move {
                let bytes = self.read_bytes().await?;
                Ok::<_, Error>(normalize_text(&String::from_utf8_lossy(&bytes)))
            })
            .await?;
        Ok(text.as_str())
    }
}

/// Upper bound on the buffer reserved from an entry's declared size. Larger
/// entries still read fully; the buffer grows as data arrives.
const MAX_PREALLOC_BYTES: u64 = 16 * 1024 * 1024;

fn initial_capacity(declared_size: u64) -> usize {
    usize::try_from(declared_size.min(MAX_PREALLOC_BYTES)).unwrap_or(0)
}

fn read_zip_entry(data: Arc<[u8]>, index: usize) -> std::result::Result<Vec<u8>, String> {
    let mut archive = ZipArchive::new(Cursor::new(data)).map_err(|e| e.to_string())?;
    let mut file = archive.by_index(index).map_err(|e| e.to_string())?;
    let mut buf = Vec::with_capacity(initial_capacity(file.size()));
    file.read_to_end(&mut buf).map_err(|e| e.to_string())?;
    Ok(buf)
}

fn normalize_path(raw: &str) -> String {
    let slashed = raw.replace('\\', "/");
    let mut path = slashed.as_str();
    while let Some(rest) = path.strip_prefix("./").or_else(|| path.strip_prefix('/')) {
        path = rest;
    }
    path.to_string()
}

/// A zip archive of CAM files.
#[derive(Debug, Clone, Default)]
pub struct BoardArchive {
    entries: Vec<ArchiveEntry>,
}

impl BoardArchive {
    /// Open an archive from raw bytes.
    ///
    /// Fails only when the bytes are not a readable zip. Directory
    /// entries are skipped; entries whose headers cannot be read are
    /// logged and skipped.
    pub fn open(bytes: impl Into<Arc<[u8]>>) -> Result<Self> {
        let data: Arc<[u8]> = bytes.into();
        let mut archive = ZipArchive::new(Cursor::new(Arc::clone(&data)))?;

        let mut entries = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let file = match archive.by_index_raw(index) {
                Ok(file) => file,
                Err(e) => {
                    warn!("Skipping unreadable archive entry #{}: {}", index, e);
                    continue;
                }
            };
            if file.is_dir() {
                continue;
            }
            let path = normalize_path(file.name());
            if path.is_empty() {
                continue;
            }
            entries.push(ArchiveEntry::new(
                path,
                EntrySource::Zip {
                    data: Arc::clone(&data),
                    index,
                },
            ));
        }

        debug!("Opened archive with {} file entries", entries.len());
        Ok(Self { entries })
    }

    /// Wrap entries that were built in memory.
    pub fn from_entries(entries: Vec<ArchiveEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<ArchiveEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("gerbers\\board-F_Cu.gbr"), "gerbers/board-F_Cu.gbr");
        assert_eq!(normalize_path("./a/b.drl"), "a/b.drl");
        assert_eq!(normalize_path("/abs.gbr"), "abs.gbr");
    }

    #[test]
    fn test_file_name_and_extension() {
        let entry = ArchiveEntry::from_text("out/Board-B_Mask.GBS", "");
        assert_eq!(entry.file_name(), "Board-B_Mask.GBS");
        assert_eq!(entry.extension().as_deref(), Some("gbs"));

        let bare = ArchiveEntry::from_text("README", "");
        assert_eq!(bare.extension(), None);
        let dotfile = ArchiveEntry::from_text(".gitignore", "");
        assert_eq!(dotfile.extension(), None);
    }

    #[test]
    fn test_declared_size_does_not_drive_allocation() {
        assert_eq!(initial_capacity(1024), 1024);
        assert_eq!(initial_capacity(u64::MAX), MAX_PREALLOC_BYTES as usize);
    }

    #[test]
    fn test_open_rejects_garbage() {
        let err = BoardArchive::open(b"definitely not a zip".to_vec()).unwrap_err();
        assert!(err.is_archive_error());
    }

    #[tokio::test]
    async fn test_memory_entry_text_is_normalised_and_cached() {
        let entry = ArchiveEntry::from_text("a.gbr", "\u{feff}\r\nD10*\r\n\r\n");
        assert_eq!(entry.read_text().await.unwrap(), "D10*");

        let clone = entry.clone();
        assert_eq!(clone.read_text().await.unwrap(), "D10*");
        assert_eq!(entry.read_bytes().await.unwrap().len(), 13);
    }
}
