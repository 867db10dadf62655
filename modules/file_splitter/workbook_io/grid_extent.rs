//! Grid extent recorded alongside a written worksheet
//!
//! xlsx readers report only the range of cells that hold values, so blank
//! trailing rows and columns vanish on reload. The writer stores the full
//! grid as a workbook-level defined name and the reader pads back to it.

/// Workbook defined name holding the written grid's A1 reference
pub const GRID_EXTENT_NAME: &str = "SplitterGridExtent";

/// Row and column count of a worksheet grid anchored at A1
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridExtent {
    pub sheet_name: String,
    pub rows: usize,
    pub columns: usize,
}

impl GridExtent {
    pub fn new(sheet_name: impl Into<String>, rows: usize, columns: usize) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            rows,
            columns,
        }
    }

    /// Absolute reference such as `'Sheet 1'!$A$1:$C$5`
    pub fn to_reference(&self) -> String {
        format!(
            "'{}'!$A$1:${}${}",
            self.sheet_name.replace('\'', "''"),
            column_letters(self.columns.saturating_sub(1)),
            self.rows
        )
    }

    /// Parse a reference produced by [`GridExtent::to_reference`]. Only
    /// grids anchored at A1 are accepted.
    pub fn parse(reference: &str) -> Option<Self> {
        let reference = reference.trim().trim_start_matches('=');
        let (sheet, cells) = reference.rsplit_once('!')?;
        let sheet_name = match sheet.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')) {
            Some(quoted) => quoted.replace("''", "'"),
            None => sheet.to_string(),
        };

        let (first, last) = cells.split_once(':')?;
        if parse_cell(first)? != (0, 1) {
            return None;
        }
        let (last_col, rows) = parse_cell(last)?;
        Some(Self::new(sheet_name, rows, last_col + 1))
    }
}

/// Zero-based column index to letters: 0 -> A, 26 -> AA
fn column_letters(mut index: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    letters.iter().rev().map(|&b| b as char).collect()
}

/// `$C$5` -> (zero-based column 2, one-based row 5)
fn parse_cell(cell: &str) -> Option<(usize, usize)> {
    let cell = cell.replace('$', "");
    let split = cell.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = cell.split_at(split);
    if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_uppercase()) {
        return None;
    }

    let mut column: usize = 0;
    for c in letters.bytes() {
        column = column.checked_mul(26)?.checked_add(usize::from(c - b'A') + 1)?;
    }
    let row: usize = digits.parse().ok()?;
    if row == 0 {
        return None;
    }
    Some((column - 1, row))
}
