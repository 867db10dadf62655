//! Bundles named file buffers into a single zip archive

use std::collections::HashSet;
use std::io::{Cursor, Write};

use thiserror::Error;
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Errors raised while building an archive
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// Two entries share a name
    #[error("Duplicate archive entry name: {0}")]
    DuplicateEntry(String),

    /// Entry names must be plain file names
    #[error("Invalid archive entry name: '{0}'")]
    InvalidEntryName(String),

    #[error("Failed to write archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Failed to write archive entry: {0}")]
    Io(#[from] std::io::Error),
}

/// One file to place in the archive
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    pub name: String,
    pub data: Vec<u8>,
}

impl ArchiveEntry {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

/// Build a deflate-compressed zip holding every entry at the archive root,
/// in the given order.
pub fn archive(entries: &[ArchiveEntry]) -> Result<Vec<u8>, ArchiveError> {
    let mut seen = HashSet::with_capacity(entries.len());
    for entry in entries {
        if entry.name.is_empty() || entry.name.contains(['/', '\\']) {
            return Err(ArchiveError::InvalidEntryName(entry.name.clone()));
        }
        if !seen.insert(entry.name.as_str()) {
            return Err(ArchiveError::DuplicateEntry(entry.name.clone()));
        }
    }

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    for entry in entries {
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        zip.start_file(entry.name.as_str(), options)?;
        zip.write_all(&entry.data)?;
        debug!("Archived {} ({} bytes)", entry.name, entry.data.len());
    }

    Ok(zip.finish()?.into_inner())
}
