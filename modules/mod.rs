//! Library for splitting spreadsheets into chunk files
//!
//! This library provides modules for:
//! - Header-preserving partitioning of worksheet rows
//! - Zip archiving of the produced chunk files
//! - The request-scoped split job with validation and temp-file cleanup
//! - The HTTP upload endpoint and service configuration

pub mod archiver;
pub mod config;
pub mod file_splitter;
pub mod http;
pub mod split_job;

// Re-export commonly used types and structs
pub use archiver::{archive, ArchiveEntry, ArchiveError};
pub use config::Config;
pub use file_splitter::{split, CellValue, FileSplitter, SplitConfig, TabularDocument};
pub use http::HttpServer;
pub use split_job::{SplitJob, SplitJobError, SplitRequest, ValidationError};
