//! # Sheet Splitter Library
//!
//! Splits the data rows of a spreadsheet into a requested number of
//! roughly equal chunk files, each keeping the original header row, and
//! bundles them into a zip archive:
//! - Row partitioning with ceiling-division chunk sizes
//! - xlsx/xls loading and xlsx serialization
//! - Zip archiving of the chunk files
//! - An axum upload endpoint with per-request scratch storage
//!
//! ## Example Usage
//!
//! ```rust
//! use sheet_splitter_lib::{split, CellValue, TabularDocument};
//!
//! let document = TabularDocument::new(
//!     vec!["A".into(), "B".into()],
//!     (0..5i64).map(|i| vec![CellValue::from(i), CellValue::from(i * 10)]).collect(),
//! );
//!
//! let chunks = split(&document, 2);
//! assert_eq!(chunks.len(), 2);
//! assert_eq!(chunks[0].data_row_count(), 3);
//! assert_eq!(chunks[1].data_row_count(), 2);
//! assert!(chunks.iter().all(|c| c.header() == document.header()));
//! ```

// Include the modules from the modules directory
#[path = "../modules/mod.rs"]
pub mod modules;

// Re-export everything from modules for easy access
pub use modules::*;

// Re-export commonly used external types for convenience
pub use anyhow::{Context, Result};
pub use tracing;

/// Version information for the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library information
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
