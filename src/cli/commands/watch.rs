//! Watch command - reconcile periodically until interrupted.
//!
//! Starts the sync scheduler, which runs one cycle immediately and then
//! one every interval. Ctrl+C stops the schedule after any in-flight
//! cycle finishes.

use anyhow::Result;
use colored::Colorize;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::Duration;

use super::sync::print_summary;
use quotebox_cli::config::Config;
use quotebox_cli::remote;
use quotebox_cli::sync::{SyncEngine, SyncOutcome, SyncScheduler};

/// Arguments for the watch command.
#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    quotebox watch                 Sync every sync_interval_secs (config)\n    \
    quotebox watch -i 10           Sync every 10 seconds")]
pub struct Args {
    /// Seconds between sync cycles (overrides config)
    #[arg(short, long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,
}

/// Executes the watch command.
pub fn run(args: Args) -> Result<()> {
    let config = Config::load()?;
    let period = args.interval.unwrap_or(config.sync_interval_secs);
    let remote = remote::from_config(&config)?;
    let book = super::open_book()?.into_shared();
    let engine = Arc::new(SyncEngine::new(book, remote));

    let rt = super::runtime()?;
    rt.block_on(watch(engine, Duration::from_secs(period)))
}

async fn watch(engine: Arc<SyncEngine>, period: Duration) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut scheduler = SyncScheduler::new(engine.clone()).with_reporter(tx);

    println!(
        "{}",
        format!(
            "Watching {} remote every {}s. Press Ctrl+C to stop.",
            engine.remote_name(),
            period.as_secs()
        )
        .bold()
    );
    if !scheduler.start(period) {
        anyhow::bail!("Could not start periodic sync (interval must be at least 1s)");
    }

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received Ctrl+C, stopping sync");
                break;
            }
            outcome = rx.recv() => {
                let Some(outcome) = outcome else { break };
                let stamp = chrono::Local::now().format("%H:%M:%S").to_string();
                print!("{} ", stamp.dimmed());
                match outcome {
                    SyncOutcome::Completed(summary) => print_summary(&summary),
                    SyncOutcome::Skipped => println!("{}", "Skipped (previous sync still running)".yellow()),
                    SyncOutcome::Failed(e) => println!("{}", format!("Sync failed: {e}").red()),
                }
            }
        }
    }

    if engine.is_busy() {
        println!("{}", "Waiting for the current sync to finish...".dimmed());
    }
    scheduler.stop_and_wait().await;
    println!("{}", "Stopped.".dimmed());
    Ok(())
}
