//! Categories command - list the distinct categories.

use anyhow::Result;
use colored::Colorize;

use crate::cli::OutputFormat;

/// Arguments for the categories command.
#[derive(clap::Args)]
pub struct Args {
    /// Output format: text (default), json
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Executes the categories command.
pub fn run(args: Args) -> Result<()> {
    let book = super::open_book()?;
    let categories = book.categories();

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&categories)?);
        }
        OutputFormat::Text => {
            if categories.is_empty() {
                println!("{}", "No categories yet.".dimmed());
                return Ok(());
            }
            let last = book.last_filter();
            for category in &categories {
                let count = book.filter(Some(category.as_str())).len();
                let marker = if last.as_deref() == Some(category.as_str()) {
                    "*".green().to_string()
                } else {
                    " ".to_string()
                };
                println!(
                    "{} {:<24} {}",
                    marker,
                    category.cyan(),
                    format!("{count} quotes").dimmed()
                );
            }
        }
    }

    Ok(())
}
