//! rollgate - forward NDJSON log events to Rollbar.
//!
//! Reads one JSON event per line from stdin and forwards each to the
//! configured Rollbar item endpoint. Per-event failures (unparseable lines,
//! failed deliveries) are logged and skipped; only configuration problems
//! abort the process.

use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rollgate_core::{Config, Event, Forwarder, ItemBuilder};

#[derive(Parser)]
#[command(name = "rollgate", version, about = "Forward log events to Rollbar")]
struct Cli {
    /// Path to the config file (default: $XDG_CONFIG_HOME/rollgate/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Build items and print them to stdout instead of delivering them
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => Config::load_from(path).context("failed to load configuration")?,
        None => Config::load().context("failed to load configuration")?,
    };

    // Initialize logging (to file, stdout belongs to the pipeline)
    let _log_guard =
        rollgate_core::logging::init(&config).context("failed to initialize logging")?;

    tracing::info!(dry_run = cli.dry_run, "rollgate starting up");

    if cli.dry_run {
        run_dry(&config)
    } else {
        run(&config).await
    }
}

/// Forward every stdin event to the collector.
async fn run(config: &Config) -> Result<()> {
    let mut forwarder =
        Forwarder::new(&config.rollbar).context("failed to initialize forwarder")?;

    for event in read_events(io::stdin().lock()) {
        forwarder.forward(&event).await;
    }

    let stats = forwarder.stats();
    tracing::info!(
        events = stats.events,
        delivered = stats.delivered,
        failed = stats.failed,
        "rollgate shutting down"
    );
    eprintln!(
        "forwarded {} of {} events ({} failed)",
        stats.delivered, stats.events, stats.failed
    );

    Ok(())
}

/// Build items for every stdin event and print them, one JSON object per line.
fn run_dry(config: &Config) -> Result<()> {
    // Same fatal-at-startup config checks as a real run
    config
        .rollbar
        .validate()
        .context("failed to initialize forwarder")?;

    let builder = ItemBuilder::new(&config.rollbar);
    for event in read_events(io::stdin().lock()) {
        let item = builder.build(&event);
        let line = serde_json::to_string(&item).context("failed to serialize item")?;
        println!("{}", line);
    }

    Ok(())
}

/// Parse NDJSON events from a reader, warning about and skipping bad lines.
fn read_events(reader: impl BufRead) -> impl Iterator<Item = Event> {
    reader
        .lines()
        .enumerate()
        .filter_map(|(index, line)| match line {
            Ok(line) => Some((index, line)),
            Err(e) => {
                tracing::warn!(line = index + 1, error = %e, "failed to read line, skipping");
                None
            }
        })
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(index, line)| {
            serde_json::from_str(&line)
                .map_err(|e| tracing::warn!(line = index + 1, error = %e, "invalid JSON, skipping"))
                .ok()
                .and_then(|value| {
                    Event::from_json(value)
                        .map_err(
                            |e| tracing::warn!(line = index + 1, error = %e, "bad event, skipping"),
                        )
                        .ok()
                })
        })
}
