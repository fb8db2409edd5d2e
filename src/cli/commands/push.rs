//! Push command - send local quotes to the remote source.
//!
//! Pushing is separate from syncing: it never changes the local book.

use anyhow::Result;
use colored::Colorize;
use std::sync::Arc;

use quotebox_cli::config::Config;
use quotebox_cli::remote;
use quotebox_cli::sync::SyncEngine;

/// Executes the push command.
pub fn run() -> Result<()> {
    let config = Config::load()?;
    let remote = remote::from_config(&config)?;
    let book = super::open_book()?.into_shared();
    let engine = Arc::new(SyncEngine::new(book, remote));

    let rt = super::runtime()?;
    let receipt = rt
        .block_on(engine.push())
        .map_err(|e| anyhow::anyhow!("Push failed: {e}"))?;

    println!(
        "{}",
        format!(
            "Pushed to {} remote: {} accepted at {}",
            engine.remote_name(),
            receipt.accepted,
            receipt.received_at.format("%Y-%m-%d %H:%M:%S UTC")
        )
        .green()
    );

    Ok(())
}
