use std::ops::Range;
use std::path::Path;
use anyhow::{bail, Result};

/// Smallest chunk count the splitter will compute with
const MIN_EFFECTIVE_CHUNK_COUNT: usize = 1;

/// Configuration for split operations
#[derive(Debug, Clone)]
pub struct SplitConfig {
    /// Requested number of output chunks (upper bound on what is produced)
    pub chunk_count: usize,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self { chunk_count: 2 }
    }
}

/// A single spreadsheet cell, copied verbatim between documents
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Empty,
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

/// In-memory grid for one worksheet. Row 0 is the header; every row is
/// padded with `CellValue::Empty` to the width of the widest row.
#[derive(Debug, Clone, PartialEq)]
pub struct TabularDocument {
    sheet_name: Option<String>,
    width: usize,
    rows: Vec<Vec<CellValue>>,
}

impl TabularDocument {
    /// Build a document from a header and its data rows
    pub fn new(header: Vec<CellValue>, data_rows: Vec<Vec<CellValue>>) -> Self {
        let mut rows = Vec::with_capacity(data_rows.len() + 1);
        rows.push(header);
        rows.extend(data_rows);

        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, CellValue::Empty);
        }

        Self {
            sheet_name: None,
            width,
            rows,
        }
    }

    /// Build a document from a raw grid whose first row is the header
    pub fn from_rows(rows: Vec<Vec<CellValue>>) -> Result<Self> {
        let mut rows = rows.into_iter();
        let Some(header) = rows.next() else {
            bail!("Spreadsheet contains no rows");
        };
        Ok(Self::new(header, rows.collect()))
    }

    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = Some(name.into());
        self
    }

    pub fn sheet_name(&self) -> Option<&str> {
        self.sheet_name.as_deref()
    }

    pub fn header(&self) -> &[CellValue] {
        &self.rows[0]
    }

    pub fn data_rows(&self) -> &[Vec<CellValue>] {
        &self.rows[1..]
    }

    /// All rows including the header
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn data_row_count(&self) -> usize {
        self.rows.len() - 1
    }

    pub fn column_count(&self) -> usize {
        self.width
    }
}

/// Row arithmetic for one split operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSpec {
    pub chunk_count: usize,
    pub total_data_rows: usize,
    pub rows_per_chunk: usize,
}

impl ChunkSpec {
    /// Compute rows-per-chunk with ceiling division. A chunk count of zero
    /// is treated as one.
    pub fn new(chunk_count: usize, total_data_rows: usize) -> Self {
        let chunk_count = chunk_count.max(MIN_EFFECTIVE_CHUNK_COUNT);
        Self {
            chunk_count,
            total_data_rows,
            rows_per_chunk: total_data_rows.div_ceil(chunk_count),
        }
    }

    /// Half-open data-row ranges for every non-empty chunk, in order
    pub fn ranges(&self) -> Vec<Range<usize>> {
        // Never more ranges than data rows, whatever the requested count
        (0..self.chunk_count)
            .map(|i| i * self.rows_per_chunk)
            .take_while(|&start| start < self.total_data_rows)
            .map(|start| start..(start + self.rows_per_chunk).min(self.total_data_rows))
            .collect()
    }
}

/// One produced chunk of a split
#[derive(Debug, Clone)]
pub struct FileChunk {
    /// Zero-based position of this chunk in the output
    pub chunk_id: usize,
    /// Header plus the assigned data rows
    pub document: TabularDocument,
    pub metadata: ChunkMetadata,
}

/// Metadata associated with a chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkMetadata {
    /// Source data-row range covered by this chunk
    pub row_range: Range<usize>,
    /// Number of data rows (header excluded)
    pub unit_count: usize,
    /// Number of columns carried over from the source
    pub column_count: usize,
}

/// Source of tabular documents. The in-memory reader loads the whole sheet;
/// a streaming reader can be put behind the same trait.
pub trait DocumentLoader {
    /// Load the active worksheet of the file at `path`
    fn load(&self, path: &Path) -> Result<TabularDocument>;

    /// Load the active worksheet from raw file bytes
    fn load_bytes(&self, data: &[u8]) -> Result<TabularDocument>;
}

/// Serializes a document into a spreadsheet file format
pub trait DocumentWriter {
    fn write(&self, document: &TabularDocument) -> Result<Vec<u8>>;
}
