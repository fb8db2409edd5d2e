//! Import command - import quotes from a JSON file.
//!
//! The file must hold a JSON array of `{"text": ..., "category": ...}`
//! objects. Entries without text are skipped; a file with no usable
//! entries is rejected and the book is left unchanged.

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

use quotebox_cli::quotes::parse_import;

/// Arguments for the import command.
#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    quotebox import quotes.json             Append quotes from a file\n    \
    quotebox import quotes.json --dry-run   Preview without saving")]
pub struct Args {
    /// JSON file to import
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Preview what would be imported without making changes
    #[arg(long)]
    pub dry_run: bool,
}

/// Executes the import command.
pub fn run(args: Args) -> Result<()> {
    let content = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    if args.dry_run {
        let batch = parse_import(&content)?;
        println!(
            "{}",
            format!("Would import {} quotes:", batch.quotes.len()).bold()
        );
        for quote in &batch.quotes {
            println!("  {quote}");
        }
        if batch.skipped > 0 {
            println!("{}", format!("{} invalid entries would be skipped", batch.skipped).yellow());
        }
        return Ok(());
    }

    let mut book = super::open_book()?;
    let report = book.import(&content)?;

    println!(
        "{}",
        format!("Imported {} quotes", report.imported).green()
    );
    if report.skipped > 0 {
        println!(
            "{}",
            format!("Skipped {} invalid entries", report.skipped).yellow()
        );
    }

    Ok(())
}
