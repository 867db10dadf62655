//! HTTP API Route Definitions

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use super::handlers::{self, AppState};

/// Create the router with all routes. Request bodies above
/// `max_upload_bytes` are rejected with 413.
pub fn create_router(app_state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/split", post(handlers::split))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(app_state)
}
