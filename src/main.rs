//! Spreadsheet splitter service and command line tool

use anyhow::{Context, Result};
use bytes::Bytes;
use clap::{Parser, Subcommand};
use sheet_splitter_lib::config::{Config, LogFormat};
use sheet_splitter_lib::split_job::{SplitJob, SplitRequest, UploadedFile};
use sheet_splitter_lib::HttpServer;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "sheet-splitter")]
#[command(about = "Split spreadsheet rows into header-preserving chunk files")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP upload service (default)
    Serve {
        /// Listen address
        #[arg(short, long)]
        listen: Option<String>,

        /// Scratch directory for uploads
        #[arg(short, long)]
        upload_dir: Option<PathBuf>,
    },

    /// Split a local spreadsheet into a zip of chunk files
    Split {
        /// Spreadsheet to split
        input: PathBuf,

        /// Number of chunks
        #[arg(short, long)]
        chunks: Option<usize>,

        /// Output archive path (default: <name>_chunks.zip)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    init_logging(&config, cli.verbose)?;

    match cli.command {
        None | Some(Commands::Serve { .. }) => serve(config).await,
        Some(Commands::Split { input, chunks, output }) => split_file(config, input, chunks, output).await,
    }
}

/// Load the config file when present, apply command line overrides and
/// validate the result for every subcommand
fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = if cli.config.exists() {
        Config::load(&cli.config)?
    } else {
        Config::default()
    };

    if let Some(Commands::Serve { listen, upload_dir }) = &cli.command {
        if let Some(listen) = listen {
            config.server.listen_addr = listen.clone();
        }
        if let Some(upload_dir) = upload_dir {
            config.server.upload_dir = upload_dir.clone();
        }
    }

    config.validate()?;
    Ok(config)
}

fn init_logging(config: &Config, verbose: u8) -> Result<()> {
    let log_level = match verbose {
        0 => config.logging.level.as_tracing_level(),
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    match config.logging.format {
        LogFormat::Text => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(log_level)
                .with_target(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        LogFormat::Json => {
            let subscriber = FmtSubscriber::builder()
                .json()
                .with_max_level(log_level)
                .with_target(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }
    Ok(())
}

async fn serve(config: Config) -> Result<()> {
    info!("Sheet splitter v{}", sheet_splitter_lib::VERSION);

    let server = HttpServer::new(config);
    server
        .run(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
}

async fn split_file(
    config: Config,
    input: PathBuf,
    chunks: Option<usize>,
    output: Option<PathBuf>,
) -> Result<()> {
    let data = tokio::fs::read(&input)
        .await
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let filename = input
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default()
        .to_string();

    let request = SplitRequest {
        file: Some(UploadedFile {
            filename,
            data: Bytes::from(data),
        }),
        chunks: chunks.map(|n| n.to_string()),
    };

    let job = SplitJob::new(config.server, config.split);
    let outcome = tokio::task::spawn_blocking(move || job.execute(request))
        .await
        .context("Split task failed")??;

    let output = output.unwrap_or_else(|| PathBuf::from(&outcome.download_name));
    tokio::fs::write(&output, &outcome.archive)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!("Wrote {} chunks to {}", outcome.chunk_names.len(), output.display());
    for name in &outcome.chunk_names {
        println!("{}", name);
    }
    Ok(())
}
