//! Solace - conversational mental-health support assistant
//!
//! CLI entry point.

#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use settings::{LogFormat, LoggingConfig};
use std::path::Path;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod app;
mod cli;
mod settings;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let cli = cli::Cli::parse();
    let config = settings::load_config()?;
    let _log_guard = init_tracing(&config.logging);

    if cli.command.is_some() {
        info!("Starting Solace v{}", env!("CARGO_PKG_VERSION"));
        if !Path::new(".env").exists() {
            warn!(".env file not found; OPENAI_API_KEY must come from the environment");
        }
    }

    cli::run(cli, config).await
}

/// Install the global subscriber. Logs go to stderr so chat output on stdout
/// stays clean; the returned guard flushes the optional log file.
fn init_tracing(logging: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "solace=info,solace_core=info".into());

    let (pretty, json) = match logging.format {
        LogFormat::Pretty => (
            Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
            None,
        ),
        LogFormat::Json => (
            None,
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            ),
        ),
    };

    let (file_layer, guard) = if logging.file.is_empty() {
        (None, None)
    } else {
        let path = Path::new(&logging.file);
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let name = path
            .file_name()
            .map_or_else(|| "solace.log".into(), |n| n.to_os_string());
        let (writer, guard) =
            tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, name));
        (
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(writer),
            ),
            Some(guard),
        )
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(pretty)
        .with(json)
        .with(file_layer)
        .init();
    guard
}
