//! HTTP API Server
//!
//! Axum-based HTTP server for the split service.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::split_job::SplitJob;

use super::handlers::AppState;
use super::routes::create_router;

/// HTTP API server
pub struct HttpServer {
    config: Config,
}

impl HttpServer {
    /// Create a new HTTP server
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the HTTP server until `shutdown` resolves
    pub async fn run(&self, shutdown: impl Future<Output = ()> + Send + 'static) -> Result<()> {
        let server = &self.config.server;
        let addr: SocketAddr = server
            .listen_addr
            .parse()
            .context("Invalid HTTP listen address")?;

        std::fs::create_dir_all(&server.upload_dir).with_context(|| {
            format!("Failed to create upload directory {}", server.upload_dir.display())
        })?;

        let app_state = AppState {
            job: Arc::new(SplitJob::new(server.clone(), self.config.split.clone())),
        };
        let app = create_router(app_state, server.max_upload_bytes).layer(TraceLayer::new_for_http());

        let listener = TcpListener::bind(&addr)
            .await
            .context("Failed to bind HTTP server")?;

        info!(
            "HTTP server listening on http://{} (uploads in {}, max {} bytes)",
            addr,
            server.upload_dir.display(),
            server.max_upload_bytes
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown.await;
                info!("HTTP server shutting down");
            })
            .await
            .context("HTTP server error")?;

        Ok(())
    }
}
