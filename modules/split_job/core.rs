//! Core split job logic

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

use crate::archiver::{archive, ArchiveEntry};
use crate::config::{ServerConfig, SplitSettings};
use crate::file_splitter::{
    DocumentLoader, DocumentWriter, FileChunk, FileSplitter, SplitConfig, WorkbookReader, XlsxWriter,
};
use super::naming::{archive_download_name, chunk_file_name, upload_file_name};
use super::types::{SplitJobError, SplitOutcome, SplitRequest, ValidatedUpload, ValidationError};

/// Prefix of the per-request scratch directories
const SCRATCH_PREFIX: &str = "split-";
/// Subdirectory of the scratch directory holding serialized chunks
const CHUNK_DIR: &str = "chunks";

/// Runs split requests: validate, then load, split, serialize and archive
/// inside a scratch directory that is removed on every exit path.
pub struct SplitJob {
    server: ServerConfig,
    settings: SplitSettings,
    loader: Box<dyn DocumentLoader + Send + Sync>,
    writer: Box<dyn DocumentWriter + Send + Sync>,
}

impl SplitJob {
    /// Creates a job runner with the workbook reader and xlsx writer
    pub fn new(server: ServerConfig, settings: SplitSettings) -> Self {
        Self::with_io(
            server,
            settings,
            Box::new(WorkbookReader::new()),
            Box::new(XlsxWriter::new()),
        )
    }

    /// Creates a job runner with a custom loader and writer
    pub fn with_io(
        server: ServerConfig,
        settings: SplitSettings,
        loader: Box<dyn DocumentLoader + Send + Sync>,
        writer: Box<dyn DocumentWriter + Send + Sync>,
    ) -> Self {
        Self {
            server,
            settings,
            loader,
            writer,
        }
    }

    // === Validation ===

    /// Checks the request in order: file present, file named, extension
    /// allowed, chunk count numeric and large enough.
    pub fn validate(&self, request: SplitRequest) -> Result<ValidatedUpload, ValidationError> {
        let file = request.file.ok_or(ValidationError::MissingFile)?;

        if file.filename.is_empty() {
            return Err(ValidationError::EmptyFilename);
        }
        if !self.server.is_allowed_file(&file.filename) {
            return Err(ValidationError::DisallowedExtension);
        }

        let chunk_count = self.parse_chunk_count(request.chunks.as_deref())?;

        Ok(ValidatedUpload {
            filename: upload_file_name(&file.filename),
            data: file.data,
            chunk_count,
        })
    }

    fn parse_chunk_count(&self, raw: Option<&str>) -> Result<usize, ValidationError> {
        let Some(raw) = raw else {
            return Ok(self.settings.default_chunk_count);
        };

        let requested: i64 = raw
            .trim()
            .parse()
            .map_err(|_| ValidationError::InvalidChunkCount)?;

        let min = self.settings.min_chunk_count;
        match usize::try_from(requested) {
            Ok(count) if count >= min => Ok(count),
            _ => Err(ValidationError::ChunkCountTooSmall { min }),
        }
    }

    // === Main Execution ===

    /// Validates and runs a request in one call
    pub fn execute(&self, request: SplitRequest) -> Result<SplitOutcome, SplitJobError> {
        let upload = self.validate(request)?;
        Ok(self.run(&upload)?)
    }

    /// Executes the split inside a fresh scratch directory and returns the
    /// archive. The scratch directory is deleted whether or not processing
    /// succeeds; a failed deletion is logged and does not change the result.
    pub fn run(&self, upload: &ValidatedUpload) -> Result<SplitOutcome> {
        let start_time = Instant::now();
        info!(
            "Starting split of '{}' ({} bytes) into {} chunks",
            upload.filename,
            upload.data.len(),
            upload.chunk_count
        );

        fs::create_dir_all(&self.server.upload_dir).with_context(|| {
            format!("Failed to create upload directory {}", self.server.upload_dir.display())
        })?;
        let scratch = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .tempdir_in(&self.server.upload_dir)
            .context("Failed to create scratch directory")?;

        let result = self.process(scratch.path(), upload);

        let scratch_path = scratch.path().to_path_buf();
        if let Err(e) = scratch.close() {
            warn!("Error cleaning up {}: {}", scratch_path.display(), e);
        }

        let mut outcome = result?;
        outcome.processing_time_ms = elapsed_ms(start_time);
        info!(
            "Split '{}' into {} chunks in {} ms",
            upload.filename,
            outcome.chunk_names.len(),
            outcome.processing_time_ms
        );
        Ok(outcome)
    }

    fn process(&self, scratch: &Path, upload: &ValidatedUpload) -> Result<SplitOutcome> {
        // Step 1: persist the upload
        let source_path = scratch.join(&upload.filename);
        fs::write(&source_path, &upload.data).with_context(|| {
            format!("Failed to save uploaded file to {}", source_path.display())
        })?;

        // Step 2: load the worksheet
        let document = self
            .loader
            .load(&source_path)
            .with_context(|| format!("Failed to read spreadsheet '{}'", upload.filename))?;

        // Step 3: partition the data rows
        let splitter = FileSplitter::with_config(SplitConfig {
            chunk_count: upload.chunk_count,
        });
        let spec = splitter.plan(&document);
        let chunks = splitter.split_document(&document);
        info!(
            "Split {} data rows of '{}' into {} chunks ({} rows per chunk)",
            spec.total_data_rows,
            upload.filename,
            chunks.len(),
            spec.rows_per_chunk
        );

        // Step 4: serialize each chunk to its own file
        let chunk_dir = scratch.join(CHUNK_DIR);
        fs::create_dir(&chunk_dir).context("Failed to create chunk directory")?;
        let chunk_files = self.write_chunks(&chunk_dir, &upload.filename, &chunks)?;

        // Step 5: bundle the chunk files
        let entries = chunk_files
            .iter()
            .map(|(name, path)| {
                let data = fs::read(path)
                    .with_context(|| format!("Failed to read chunk file {}", path.display()))?;
                Ok(ArchiveEntry::new(name.clone(), data))
            })
            .collect::<Result<Vec<_>>>()?;
        let archive_bytes = archive(&entries).context("Failed to create zip archive")?;

        Ok(SplitOutcome {
            download_name: archive_download_name(&upload.filename),
            chunk_names: chunk_files.into_iter().map(|(name, _)| name).collect(),
            total_data_rows: spec.total_data_rows,
            rows_per_chunk: spec.rows_per_chunk,
            processing_time_ms: 0,
            archive: archive_bytes,
        })
    }

    fn write_chunks(
        &self,
        chunk_dir: &Path,
        file_name: &str,
        chunks: &[FileChunk],
    ) -> Result<Vec<(String, PathBuf)>> {
        let mut files = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            let name = chunk_file_name(file_name, chunk.chunk_id + 1);
            let bytes = self
                .writer
                .write(&chunk.document)
                .with_context(|| format!("Failed to serialize chunk {}", chunk.chunk_id + 1))?;

            let path = chunk_dir.join(&name);
            fs::write(&path, &bytes)
                .with_context(|| format!("Failed to write chunk file {}", path.display()))?;

            info!(
                "Chunk {}: rows {}..{}, {} data rows, {} bytes -> {}",
                chunk.chunk_id + 1,
                chunk.metadata.row_range.start,
                chunk.metadata.row_range.end,
                chunk.metadata.unit_count,
                bytes.len(),
                name
            );
            files.push((name, path));
        }
        Ok(files)
    }
}

/// Milliseconds since `start`, saturating at `u64::MAX`
fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
