//! Mapping of split failures onto HTTP responses

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{error, warn};

use crate::split_job::{SplitJobError, ValidationError};
use super::types::ErrorResponse;

/// Any failure of a request to the split API
#[derive(Debug)]
pub enum ApiError {
    /// Rejected before processing (400)
    Validation(ValidationError),
    /// The multipart body could not be read (status chosen by axum, 413 for
    /// oversized bodies)
    Upload { status: StatusCode, message: String },
    /// Processing failed after validation (500)
    Processing(anyhow::Error),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err)
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::Upload {
            status: err.status(),
            message: err.body_text(),
        }
    }
}

impl From<SplitJobError> for ApiError {
    fn from(err: SplitJobError) -> Self {
        match err {
            SplitJobError::Validation(e) => ApiError::Validation(e),
            SplitJobError::Processing(e) => ApiError::Processing(e),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Processing(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(e) => {
                warn!("Rejected split request: {}", e);
                (StatusCode::BAD_REQUEST, ErrorResponse::new(e.code(), e.to_string()))
            }
            ApiError::Upload { status, message } => {
                warn!("Failed to read upload ({}): {}", status, message);
                let code = if status == StatusCode::PAYLOAD_TOO_LARGE {
                    "PAYLOAD_TOO_LARGE"
                } else {
                    "BAD_UPLOAD"
                };
                (status, ErrorResponse::new(code, message))
            }
            ApiError::Processing(e) => {
                error!("Split request failed: {:#}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::internal_error(format!("{:#}", e)),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
