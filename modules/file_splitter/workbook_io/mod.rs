//! Spreadsheet file I/O for tabular documents
//!
//! - WorkbookReader: loads the first worksheet of xlsx/xls/xlsb/ods files
//! - XlsxWriter: serializes a document as a single-sheet xlsx workbook
//! - GridExtent: full grid size recorded by the writer, honored by the reader

pub mod grid_extent;
pub mod reader;
pub mod writer;

pub use grid_extent::{GridExtent, GRID_EXTENT_NAME};
pub use reader::WorkbookReader;
pub use writer::XlsxWriter;
