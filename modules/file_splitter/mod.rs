//! File Splitter Library
//!
//! Partitions the data rows of a spreadsheet into a requested number of
//! roughly equal chunks. Every chunk keeps the source header row; chunk
//! sizes come from ceiling division so the requested count is an upper
//! bound on what is produced.

pub mod types;
pub mod splitter;
pub mod workbook_io;

// Re-export main types and the FileSplitter
pub use types::*;
pub use splitter::{split, FileSplitter};
pub use workbook_io::{WorkbookReader, XlsxWriter};


#[cfg(test)]
mod proptests;
