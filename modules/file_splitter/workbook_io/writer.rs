use super::super::types::*;
use super::grid_extent::{GridExtent, GRID_EXTENT_NAME};
use anyhow::{bail, Context, Result};
use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook};

/// Row limit of an xlsx worksheet
pub const XLSX_MAX_ROWS: usize = 1_048_576;
/// Column limit of an xlsx worksheet
pub const XLSX_MAX_COLUMNS: usize = 16_384;

/// Writes a document as a single-worksheet xlsx workbook.
///
/// Empty cells are left unwritten, except a blank bottom-right corner cell,
/// which keeps the worksheet dimension at the full grid. The grid size is
/// also stored under the `SplitterGridExtent` defined name so trailing blank
/// rows and columns survive a reload. The worksheet takes the document's
/// sheet name when it has one.
pub struct XlsxWriter;

impl XlsxWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for XlsxWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentWriter for XlsxWriter {
    fn write(&self, document: &TabularDocument) -> Result<Vec<u8>> {
        if document.row_count() > XLSX_MAX_ROWS {
            bail!("Chunk has {} rows, xlsx allows at most {}", document.row_count(), XLSX_MAX_ROWS);
        }
        if document.column_count() > XLSX_MAX_COLUMNS {
            bail!(
                "Chunk has {} columns, xlsx allows at most {}",
                document.column_count(),
                XLSX_MAX_COLUMNS
            );
        }

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        if let Some(name) = document.sheet_name() {
            worksheet
                .set_name(name)
                .with_context(|| format!("Invalid worksheet name '{}'", name))?;
        }

        for (row_idx, row) in document.rows().iter().enumerate() {
            let row_num = RowNum::try_from(row_idx)?;
            for (col_idx, cell) in row.iter().enumerate() {
                let col_num = ColNum::try_from(col_idx)?;
                match cell {
                    CellValue::Text(text) => {
                        worksheet.write_string(row_num, col_num, text)?;
                    }
                    CellValue::Number(number) => {
                        worksheet.write_number(row_num, col_num, *number)?;
                    }
                    CellValue::Bool(flag) => {
                        worksheet.write_boolean(row_num, col_num, *flag)?;
                    }
                    CellValue::Empty => {}
                }
            }
        }

        let columns = document.column_count();
        let sheet_name = worksheet.name();
        if columns > 0 {
            let last_row = RowNum::try_from(document.row_count() - 1)?;
            let last_col = ColNum::try_from(columns - 1)?;
            if document.rows()[document.row_count() - 1][columns - 1].is_empty() {
                worksheet.write_blank(last_row, last_col, &Format::new())?;
            }

            let extent = GridExtent::new(sheet_name, document.row_count(), columns);
            workbook
                .define_name(GRID_EXTENT_NAME, &extent.to_reference())
                .context("Failed to record worksheet extent")?;
        }

        workbook
            .save_to_buffer()
            .context("Failed to serialize xlsx workbook")
    }
}
