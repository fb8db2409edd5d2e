//! Sync command - reconcile once with the remote source.
//!
//! Fetches a snapshot from the configured remote and merges it into the
//! book. On a category conflict the remote always wins.

use anyhow::Result;
use colored::Colorize;
use std::sync::Arc;

use crate::cli::OutputFormat;
use quotebox_cli::config::Config;
use quotebox_cli::remote;
use quotebox_cli::sync::{Change, ReconciliationSummary, SyncEngine, SyncOutcome};

/// Arguments for the sync command.
#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    quotebox sync                  Reconcile with the configured remote\n    \
    quotebox sync --format json    Print the summary as JSON")]
pub struct Args {
    /// Output format: text (default), json
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Executes the sync command.
pub fn run(args: Args) -> Result<()> {
    let config = Config::load()?;
    let remote = remote::from_config(&config)?;
    let book = super::open_book()?.into_shared();
    let engine = Arc::new(SyncEngine::new(book, remote));

    if args.format == OutputFormat::Text {
        println!(
            "{}",
            format!("Syncing with {} remote...", engine.remote_name()).dimmed()
        );
    }

    let rt = super::runtime()?;
    match rt.block_on(engine.sync_once()) {
        SyncOutcome::Completed(summary) => match args.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
            OutputFormat::Text => print_summary(&summary),
        },
        SyncOutcome::Skipped => {
            println!("{}", "Another sync is in progress.".yellow());
        }
        SyncOutcome::Failed(e) => {
            anyhow::bail!("Sync failed: {e}\n\nYour local quotes were not changed.");
        }
    }

    Ok(())
}

/// Prints a reconciliation summary with one line per change.
pub(crate) fn print_summary(summary: &ReconciliationSummary) {
    if !summary.has_changes() {
        println!("{}", summary.headline().dimmed());
        return;
    }

    println!("{}", summary.headline().green());
    for change in &summary.changes {
        let line = change.to_string();
        match change {
            Change::Added { .. } => println!("  {}", line.green()),
            Change::CategoryChanged { .. } => println!("  {}", line.yellow()),
        }
    }
}
