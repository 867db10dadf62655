//! Request handlers: upload form, health, split

use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use tracing::{debug, info};

use crate::split_job::{SplitJob, SplitRequest, UploadedFile};
use super::error::ApiError;
use super::types::HealthResponse;

/// Multipart field carrying the spreadsheet
const FILE_FIELD: &str = "file";
/// Multipart field carrying the chunk count
const CHUNKS_FIELD: &str = "chunks";

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Spreadsheet Splitter</title>
</head>
<body>
  <h1>Spreadsheet Splitter</h1>
  <form action="/split" method="post" enctype="multipart/form-data">
    <p><input type="file" name="file" accept=".xlsx,.xls" required></p>
    <p>
      <label for="chunks">Number of chunks</label>
      <input type="number" id="chunks" name="chunks" min="2" value="2">
    </p>
    <p><button type="submit">Split and download</button></p>
  </form>
</body>
</html>
"#;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub job: Arc<SplitJob>,
}

/// Upload form
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        healthy: true,
        version: crate::VERSION.to_string(),
    })
}

/// Split endpoint: multipart `file` plus optional `chunks`, answers with a
/// zip of the chunk files
pub async fn split(State(state): State<AppState>, multipart: Multipart) -> Result<Response, ApiError> {
    let request = read_split_request(multipart).await?;
    let upload = state.job.validate(request)?;
    info!(
        "HTTP split request: '{}' ({} bytes), {} chunks",
        upload.filename,
        upload.data.len(),
        upload.chunk_count
    );

    let job = state.job.clone();
    let outcome = tokio::task::spawn_blocking(move || job.run(&upload))
        .await
        .map_err(|e| anyhow::anyhow!("Split task failed: {}", e))??;

    let disposition = format!("attachment; filename=\"{}\"", outcome.download_name);
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        outcome.archive,
    )
        .into_response())
}

/// Collect the `file` and `chunks` fields; other fields are ignored.
/// A `file` field without a file name is not a file upload.
async fn read_split_request(mut multipart: Multipart) -> Result<SplitRequest, ApiError> {
    let mut request = SplitRequest::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(FILE_FIELD) => {
                let Some(filename) = field.file_name().map(str::to_string) else {
                    continue;
                };
                let data = field.bytes().await?;
                debug!("Received file field '{}' ({} bytes)", filename, data.len());
                request.file = Some(UploadedFile { filename, data });
            }
            Some(CHUNKS_FIELD) => {
                request.chunks = Some(field.text().await?);
            }
            other => debug!("Ignoring multipart field {:?}", other),
        }
    }

    Ok(request)
}
