use super::super::types::*;
use super::grid_extent::{GridExtent, GRID_EXTENT_NAME};
use anyhow::{Context, Result};
use calamine::{open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use tracing::debug;

/// Padding beyond the used range that a recorded grid extent may always add
const MIN_PADDING_ALLOWANCE: usize = 1_000_000;

/// Loads the active (first) worksheet of a workbook into memory.
///
/// The used range is re-anchored at A1, so a sheet whose data starts at
/// C3 still has its header at row 1 (filled with empty cells). When the
/// workbook records a grid extent for the sheet, trailing blank rows and
/// columns are restored up to that extent.
pub struct WorkbookReader;

impl WorkbookReader {
    pub fn new() -> Self {
        Self
    }

    fn read_first_sheet<RS: Read + Seek>(&self, mut workbook: Sheets<RS>) -> Result<TabularDocument> {
        let sheet_name = workbook.sheet_names().first().cloned();
        let extent = workbook
            .defined_names()
            .iter()
            .find(|(name, _)| name == GRID_EXTENT_NAME)
            .and_then(|(_, reference)| GridExtent::parse(reference))
            .filter(|extent| sheet_name.as_deref() == Some(extent.sheet_name.as_str()));
        let range = workbook
            .worksheet_range_at(0)
            .context("Workbook contains no worksheets")?
            .context("Failed to read worksheet")?;

        let mut rows = range_to_rows(&range);
        if let Some(extent) = extent {
            pad_to_extent(&mut rows, &extent);
        }
        debug!("Loaded worksheet {:?}: {} rows", sheet_name, rows.len());

        let document = TabularDocument::from_rows(rows)?;
        Ok(match sheet_name {
            Some(name) => document.with_sheet_name(name),
            None => document,
        })
    }
}

impl Default for WorkbookReader {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentLoader for WorkbookReader {
    // Format is detected from content, not from the extension
    fn load(&self, path: &Path) -> Result<TabularDocument> {
        let data = std::fs::read(path)
            .with_context(|| format!("Failed to open spreadsheet {}", path.display()))?;
        self.load_bytes(&data)
    }

    fn load_bytes(&self, data: &[u8]) -> Result<TabularDocument> {
        let workbook = open_workbook_auto_from_rs(Cursor::new(data.to_vec()))
            .context("Failed to open spreadsheet data")?;
        self.read_first_sheet(workbook)
    }
}

/// Expand a used range into a grid anchored at A1
fn range_to_rows(range: &Range<Data>) -> Vec<Vec<CellValue>> {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };

    let mut rows: Vec<Vec<CellValue>> = vec![Vec::new(); start_row as usize];
    for row in range.rows() {
        let mut cells = vec![CellValue::Empty; start_col as usize];
        cells.extend(row.iter().map(cell_value));
        rows.push(cells);
    }
    rows
}

/// Grow the grid to a recorded extent. Never shrinks, and ignores extents
/// that would pad far beyond the cells actually present.
fn pad_to_extent(rows: &mut Vec<Vec<CellValue>>, extent: &GridExtent) {
    let used_rows = rows.len();
    let used_columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let target_rows = extent.rows.max(used_rows);
    let target_columns = extent.columns.max(used_columns);

    let used_cells = used_rows.saturating_mul(used_columns);
    let target_cells = target_rows.saturating_mul(target_columns);
    if target_cells - used_cells > used_cells.max(MIN_PADDING_ALLOWANCE) {
        debug!(
            "Ignoring recorded grid extent {}x{} for a {}x{} used range",
            extent.rows, extent.columns, used_rows, used_columns
        );
        return;
    }

    rows.resize_with(target_rows, Vec::new);
    if let Some(first) = rows.first_mut() {
        if first.len() < target_columns {
            first.resize(target_columns, CellValue::Empty);
        }
    }
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Int(v) => CellValue::Number(*v as f64),
        Data::Float(v) => CellValue::Number(*v),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        // Excel serial date; number formats are not carried over
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
        Data::Empty => CellValue::Empty,
    }
}
