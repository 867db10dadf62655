use super::types::*;
use tracing::debug;

/// Partitions a document's data rows into header-preserving chunks
pub struct FileSplitter {
    config: SplitConfig,
}

impl FileSplitter {
    /// Create a new file splitter with default configuration
    pub fn new() -> Self {
        Self {
            config: SplitConfig::default(),
        }
    }

    /// Create a new file splitter with custom configuration
    pub fn with_config(config: SplitConfig) -> Self {
        Self { config }
    }

    /// Compute the chunk layout for a document without copying any rows
    pub fn plan(&self, document: &TabularDocument) -> ChunkSpec {
        ChunkSpec::new(self.config.chunk_count, document.data_row_count())
    }

    /// Split a document into at most `chunk_count` chunks.
    ///
    /// Chunks are contiguous and ordered; trailing empty chunks are never
    /// produced. A document with no data rows yields a single header-only
    /// chunk.
    pub fn split_document(&self, document: &TabularDocument) -> Vec<FileChunk> {
        let spec = self.plan(document);
        debug!(
            "Splitting {} data rows into at most {} chunks of {} rows",
            spec.total_data_rows, spec.chunk_count, spec.rows_per_chunk
        );

        if spec.total_data_rows == 0 {
            return vec![self.build_chunk(document, 0, 0..0)];
        }

        spec.ranges()
            .into_iter()
            .enumerate()
            .map(|(chunk_id, range)| self.build_chunk(document, chunk_id, range))
            .collect()
    }

    fn build_chunk(
        &self,
        document: &TabularDocument,
        chunk_id: usize,
        row_range: std::ops::Range<usize>,
    ) -> FileChunk {
        let data_rows = document.data_rows()[row_range.clone()].to_vec();
        let mut chunk_doc = TabularDocument::new(document.header().to_vec(), data_rows);
        if let Some(name) = document.sheet_name() {
            chunk_doc = chunk_doc.with_sheet_name(name);
        }

        FileChunk {
            chunk_id,
            metadata: ChunkMetadata {
                unit_count: row_range.len(),
                column_count: chunk_doc.column_count(),
                row_range,
            },
            document: chunk_doc,
        }
    }
}

impl Default for FileSplitter {
    fn default() -> Self {
        Self::new()
    }
}

/// Split `document` into at most `chunk_count` documents, each carrying
/// the source header and a contiguous slice of the data rows.
pub fn split(document: &TabularDocument, chunk_count: usize) -> Vec<TabularDocument> {
    FileSplitter::with_config(SplitConfig { chunk_count })
        .split_document(document)
        .into_iter()
        .map(|chunk| chunk.document)
        .collect()
}
