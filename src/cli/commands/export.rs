//! Export command - write the book as a JSON file.
//!
//! The output is the same format `import` reads, so an export can be
//! imported elsewhere without loss.

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

/// Arguments for the export command.
#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    quotebox export                    Print JSON to stdout\n    \
    quotebox export -o quotes.json     Write to a file")]
pub struct Args {
    /// Write output to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Executes the export command.
pub fn run(args: Args) -> Result<()> {
    let book = super::open_book()?;
    let json = book.export().context("Failed to serialize quotes")?;

    match args.output {
        Some(path) => {
            fs::write(&path, format!("{json}\n"))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "{}",
                format!(
                    "Exported {} quotes to {}",
                    book.store().len(),
                    path.display()
                )
                .green()
            );
        }
        None => println!("{json}"),
    }

    Ok(())
}
