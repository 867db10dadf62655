//! Service configuration
//!
//! Loaded once at startup from an optional TOML file, adjusted by CLI
//! flags, and handed to the HTTP layer. Nothing here is global state.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Default maximum request body size: 100 MiB
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub split: SplitSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server and upload handling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP server binds to
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// Scratch directory for per-request temporary files
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,
    /// Maximum accepted request body size in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    /// Accepted file extensions, compared case-insensitively
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
}

fn default_listen_addr() -> String {
    "0.0.0.0:5000".to_string()
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_max_upload_bytes() -> usize {
    DEFAULT_MAX_UPLOAD_BYTES
}

fn default_allowed_extensions() -> Vec<String> {
    vec!["xlsx".to_string(), "xls".to_string()]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            upload_dir: default_upload_dir(),
            max_upload_bytes: default_max_upload_bytes(),
            allowed_extensions: default_allowed_extensions(),
        }
    }
}

impl ServerConfig {
    /// Whether `filename` ends in an allowed extension
    pub fn is_allowed_file(&self, filename: &str) -> bool {
        match filename.rsplit_once('.') {
            Some((_, ext)) => self
                .allowed_extensions
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext)),
            None => false,
        }
    }
}

/// Chunk count handling for split requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitSettings {
    /// Chunk count used when the request does not provide one
    #[serde(default = "default_chunk_count")]
    pub default_chunk_count: usize,
    /// Smallest chunk count a request may ask for
    #[serde(default = "default_min_chunk_count")]
    pub min_chunk_count: usize,
}

fn default_chunk_count() -> usize {
    2
}

fn default_min_chunk_count() -> usize {
    2
}

impl Default for SplitSettings {
    fn default() -> Self {
        Self {
            default_chunk_count: default_chunk_count(),
            min_chunk_count: default_min_chunk_count(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

/// Log severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    pub fn as_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
    #[serde(default = "default_log_level")]
    pub level: LogLevel,
}

fn default_log_format() -> LogFormat {
    LogFormat::Text
}

fn default_log_level() -> LogLevel {
    LogLevel::Info
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: default_log_format(),
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load and validate configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all fields, reporting every problem at once
    pub fn validate(&self) -> Result<()> {
        let mut errors: Vec<String> = Vec::new();

        if self.server.listen_addr.parse::<std::net::SocketAddr>().is_err() {
            errors.push(format!("listen_addr '{}' is not a socket address", self.server.listen_addr));
        }
        if self.server.max_upload_bytes == 0 {
            errors.push("max_upload_bytes must be positive".to_string());
        }
        if self.server.allowed_extensions.is_empty() {
            errors.push("allowed_extensions must not be empty".to_string());
        }
        if self
            .server
            .allowed_extensions
            .iter()
            .any(|ext| ext.is_empty() || ext.contains('.'))
        {
            errors.push("allowed_extensions entries must be bare extensions like \"xlsx\"".to_string());
        }
        if self.split.min_chunk_count < 2 {
            errors.push("min_chunk_count must be at least 2".to_string());
        }
        if self.split.default_chunk_count < self.split.min_chunk_count {
            errors.push("default_chunk_count must not be below min_chunk_count".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(anyhow::anyhow!(
                "Invalid configuration:\n  - {}",
                errors.join("\n  - ")
            ))
        }
    }
}
