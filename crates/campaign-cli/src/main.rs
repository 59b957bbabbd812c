//! Smart Campaign Advisor CLI
//!
//! Serves the analysis page or runs a single analysis in the terminal.

use anyhow::Result;
use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod output;

use commands::Cli;

/// Initialize tracing, optionally mirroring events into a log file.
///
/// The returned guard flushes the file writer and must live until exit.
fn init_tracing(log_file: Option<&std::path::Path>) -> Option<WorkerGuard> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "campaign=info,campaign_web=debug,campaign_pipeline=debug,campaign_gemini=info".into()
    });

    let file_writer = log_file.and_then(|path| {
        let dir = path.parent().filter(|p| !p.as_os_str().is_empty())?;
        let name = path.file_name()?;
        let _ = std::fs::create_dir_all(dir);
        Some(tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name)))
    });

    match file_writer {
        Some((writer, guard)) => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(writer)
                        .with_ansi(false),
                )
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // A bare file name logs next to the working directory.
    let log_file = cli.log_file.as_ref().map(|path| {
        if path.parent().map_or(true, |p| p.as_os_str().is_empty()) {
            std::path::Path::new(".").join(path)
        } else {
            path.clone()
        }
    });
    let _guard = init_tracing(log_file.as_deref());

    cli.execute().await
}
