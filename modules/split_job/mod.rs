//! Split job module for handling one upload end to end
//!
//! This module provides the request-scoped pipeline around the splitter:
//! - Validating the uploaded file name and requested chunk count
//! - Saving the upload into a per-request scratch directory
//! - Loading, splitting and serializing the worksheet
//! - Bundling the chunk files into a zip archive
//! - Removing every temporary file on success and on failure

pub mod types;
pub mod naming;
pub mod core;

pub use types::{
    SplitJobError,
    SplitOutcome,
    SplitRequest,
    UploadedFile,
    ValidatedUpload,
    ValidationError,
};

pub use self::core::SplitJob;
