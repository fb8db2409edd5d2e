//! Show command - display a random quote.
//!
//! Picks one quote uniformly at random, optionally restricted to a
//! category. The chosen category is remembered and reused the next time
//! no category is given.

use anyhow::Result;
use colored::Colorize;

use crate::cli::OutputFormat;
use quotebox_cli::quotes::{is_all_filter, ALL_CATEGORIES};

/// Arguments for the show command.
#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    quotebox show                   Random quote (last used category)\n    \
    quotebox show -c Wisdom         Random quote from 'Wisdom'\n    \
    quotebox show -c all            Random quote from every category\n    \
    quotebox show --format json     Output as JSON")]
pub struct Args {
    /// Category to pick from ('all' for every category)
    #[arg(short, long, value_name = "CATEGORY")]
    #[arg(long_help = "Restrict the pick to this category. The choice is saved\n\
        and used by later 'show' calls that omit --category.\n\
        Use 'all' to clear the saved filter.")]
    pub category: Option<String>,

    /// Output format: text (default), json
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Executes the show command.
pub fn run(args: Args) -> Result<()> {
    let book = super::open_book()?;

    let category = match args.category {
        Some(category) => {
            book.set_last_filter(category.trim());
            Some(category)
        }
        None => book.last_filter(),
    };
    let category = category.filter(|c| !is_all_filter(Some(c.as_str())));

    let Some(quote) = book.random(category.as_deref(), &mut rand::thread_rng()) else {
        let scope = category.as_deref().unwrap_or(ALL_CATEGORIES);
        println!(
            "{}",
            format!("No quotes available in '{scope}'.").yellow()
        );
        println!();
        println!(
            "Run {} to see categories or {} to add one.",
            "quotebox categories".cyan(),
            "quotebox add".cyan()
        );
        return Ok(());
    };

    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&quote)?);
        }
        OutputFormat::Text => {
            println!("{}", format!("\u{201c}{}\u{201d}", quote.text).bold());
            println!("  {}", format!("- {}", quote.category).dimmed());
        }
    }

    Ok(())
}
