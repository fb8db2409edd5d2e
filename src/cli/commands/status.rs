//! Status command - show the state of the book and of sync.
//!
//! Displays quote and category counts, the saved category filter, the
//! configured remote, and the outcome of the last successful sync.

use anyhow::Result;
use colored::Colorize;

use quotebox_cli::config::Config;
use quotebox_cli::storage::db::default_db_path;

/// Executes the status command.
pub fn run() -> Result<()> {
    let config = Config::load()?;
    let book = super::open_book()?;

    println!("{}", "Quotebox".bold().cyan());
    println!();

    println!("{}", "Book:".bold());
    println!("  Quotes:      {}", book.store().len());
    println!("  Categories:  {}", book.categories().len());
    println!(
        "  Filter:      {}",
        book.last_filter().unwrap_or_else(|| "all".to_string())
    );

    println!();
    println!("{}", "Sync:".bold());
    println!("  Remote:      {}", config.remote);
    match book.last_sync() {
        Ok(Some(last)) => {
            let ago = chrono::Utc::now()
                .signed_duration_since(last.at)
                .num_minutes();
            let ago_str = if ago < 1 {
                "just now".to_string()
            } else if ago < 60 {
                format!("{ago} minutes ago")
            } else if ago < 60 * 24 {
                format!("{} hours ago", ago / 60)
            } else {
                format!("{} days ago", ago / (60 * 24))
            };
            println!(
                "  Last sync:   {} {}",
                last.at.format("%Y-%m-%d %H:%M:%S UTC"),
                format!("({ago_str})").dimmed()
            );
            if let Some(summary) = last.summary {
                println!("  Result:      {}", summary.headline());
            }
        }
        Ok(None) => {
            println!("  Last sync:   {}", "never".dimmed());
            println!();
            println!(
                "{}",
                "Hint: Run 'quotebox sync' to reconcile with the remote".yellow()
            );
        }
        Err(e) => {
            tracing::warn!("Failed to read last sync: {e}");
            println!("  Last sync:   {}", "unknown".dimmed());
        }
    }

    println!();
    println!("  {}  {}", "Database:".dimmed(), default_db_path()?.display());
    Ok(())
}
