//! Types and data structures for the split job module

use bytes::Bytes;
use thiserror::Error;

/// A file received from the client
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub data: Bytes,
}

/// Raw split request as received, before validation
#[derive(Debug, Clone, Default)]
pub struct SplitRequest {
    pub file: Option<UploadedFile>,
    /// Unparsed chunk count field
    pub chunks: Option<String>,
}

/// A request that passed validation
#[derive(Debug, Clone)]
pub struct ValidatedUpload {
    /// Sanitized file name, safe to use as a path component
    pub filename: String,
    pub data: Bytes,
    pub chunk_count: usize,
}

/// Result of a completed split job
#[derive(Debug, Clone)]
pub struct SplitOutcome {
    /// Suggested download name for the archive
    pub download_name: String,
    /// Entry names in chunk order
    pub chunk_names: Vec<String>,
    pub total_data_rows: usize,
    pub rows_per_chunk: usize,
    pub processing_time_ms: u64,
    /// Zip archive bytes
    pub archive: Vec<u8>,
}

/// Problems with the request itself, reported before any work starts
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("No file part")]
    MissingFile,

    #[error("No selected file")]
    EmptyFilename,

    #[error("File type not allowed")]
    DisallowedExtension,

    #[error("Invalid number of chunks")]
    InvalidChunkCount,

    #[error("Number of chunks must be at least {min}")]
    ChunkCountTooSmall { min: usize },
}

impl ValidationError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingFile => "MISSING_FILE",
            Self::EmptyFilename => "EMPTY_FILENAME",
            Self::DisallowedExtension => "FILE_TYPE_NOT_ALLOWED",
            Self::InvalidChunkCount => "INVALID_CHUNK_COUNT",
            Self::ChunkCountTooSmall { .. } => "CHUNK_COUNT_TOO_SMALL",
        }
    }
}

/// Failure of a split job
#[derive(Error, Debug)]
pub enum SplitJobError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// I/O, parsing, serialization or archiving failed
    #[error(transparent)]
    Processing(#[from] anyhow::Error),
}
