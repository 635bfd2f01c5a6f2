use std::path::Path;

use clap::Parser;
use color_eyre::Result;
use tracing::level_filters::LevelFilter;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ScanConfig;
use crate::prober::MetadataProber;

mod cli;
mod config;
mod model;
mod output;
mod prober;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = cli::Args::parse();

    // Validation happens before anything touches the network.
    let file_config = config::load(args.config.as_deref())?;
    let config = ScanConfig::resolve(&args, file_config)?;

    let _guard = initialize_logging(config.log_dir.as_deref(), args.log_level())?;
    debug!(?config, "Resolved configuration");

    let prober = MetadataProber::from_config(&config)?;
    let report = match &config.providers {
        Some(providers) => prober.probe_many(providers).await,
        None => prober.probe_all().await,
    };

    if report.is_empty() {
        warn!("Provider list is empty, nothing was scanned");
    }

    let exposed: Vec<_> = report.exposed().map(|p| p.display_name()).collect();
    if exposed.is_empty() {
        info!(scanned = report.len(), "No metadata endpoint reachable");
    } else {
        warn!(providers = ?exposed, "Metadata endpoint reachable without authentication");
    }

    match &config.output {
        Some(path) => {
            output::write_file(&report, path)?;
            println!("Scan results saved to {}", path.display());
        }
        None => output::write_stdout(&report)?,
    }

    Ok(())
}

/// Logs go to stderr so stdout only carries the report. With a log directory
/// they are also written to a daily-rolling file.
fn initialize_logging(log_dir: Option<&Path>, level: LevelFilter) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let (file_layer, guard) = match log_dir {
        Some(directory) => {
            std::fs::create_dir_all(directory)?;
            let file_appender = tracing_appender::rolling::daily(directory, "metadata-scanner.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(file_layer)
        .init();

    Ok(guard)
}
