//! HTTP API Server Module
//!
//! Serves the upload form and the split endpoint that turns an uploaded
//! spreadsheet into a zip of chunk files.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use handlers::AppState;
pub use routes::create_router;
pub use server::HttpServer;

#[cfg(test)]
mod tests;
