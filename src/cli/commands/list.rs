//! List command - list quotes in insertion order.

use anyhow::Result;
use colored::Colorize;

use crate::cli::OutputFormat;
use quotebox_cli::storage::QuoteRecord;

/// Arguments for the list command.
#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    quotebox list                   List every quote\n    \
    quotebox list -c Life           Only quotes in 'Life'\n    \
    quotebox list --format json     Output as JSON")]
pub struct Args {
    /// Only list quotes in this category
    #[arg(short, long, value_name = "CATEGORY")]
    pub category: Option<String>,

    /// Output format: text (default), json
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Column width for the category column.
const CATEGORY_WIDTH: usize = 16;

/// Executes the list command.
pub fn run(args: Args) -> Result<()> {
    let book = super::open_book()?;
    let quotes = book.filter(args.category.as_deref());

    match args.format {
        OutputFormat::Json => {
            let records: Vec<QuoteRecord> = quotes.iter().map(QuoteRecord::from).collect();
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        OutputFormat::Text => {
            if quotes.is_empty() {
                println!("{}", "No quotes found.".dimmed());
                return Ok(());
            }
            println!(
                "{}",
                format!("{:<CATEGORY_WIDTH$}  {}", "CATEGORY", "QUOTE").bold()
            );
            for quote in &quotes {
                println!(
                    "{:<CATEGORY_WIDTH$}  {}",
                    truncate_to_width(&quote.category, CATEGORY_WIDTH).cyan(),
                    quote.text
                );
            }
        }
    }

    Ok(())
}

/// Truncates a string to at most `max_width` characters, ending in "..."
/// when shortened.
fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else if max_width <= 3 {
        ".".repeat(max_width)
    } else {
        let kept: String = s.chars().take(max_width - 3).collect();
        format!("{kept}...")
    }
}
