//! Add command - add a quote to the book.

use anyhow::Result;
use colored::Colorize;

/// Arguments for the add command.
#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    quotebox add \"Well begun is half done.\" -c Wisdom\n    \
    quotebox add \"No category given\"          Stored as 'Uncategorized'")]
pub struct Args {
    /// Quote text
    #[arg(value_name = "TEXT")]
    pub text: String,

    /// Category (defaults to 'Uncategorized')
    #[arg(short, long, default_value = "", value_name = "CATEGORY")]
    pub category: String,
}

/// Executes the add command.
///
/// Empty text is rejected with a message and nothing is stored.
pub fn run(args: Args) -> Result<()> {
    let mut book = super::open_book()?;

    let quote = book.add(&args.text, &args.category)?;
    println!("{} {}", "Added".green(), quote.to_string().bold());

    Ok(())
}
