use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;

use cli::commands;

/// The main CLI command line interface.
#[derive(Parser)]
#[command(name = "quotebox")]
#[command(version)]
#[command(about = "A quote book that stays in step with a remote source")]
#[command(long_about = "Quotebox keeps a local book of quotes grouped by category,\n\
    shows a random one on demand, and reconciles the book with a remote\n\
    source. When local and remote disagree on a category, the remote wins.")]
#[command(after_help = "EXAMPLES:\n    \
    quotebox show                    Show a random quote\n    \
    quotebox show -c Wisdom          Show a random Wisdom quote\n    \
    quotebox add \"Less is more\" -c Design\n    \
    quotebox sync                    Reconcile once with the remote\n    \
    quotebox watch                   Reconcile on a timer until Ctrl+C\n    \
    quotebox export -o quotes.json   Back up the book\n\n\
    For more information about a command, run 'quotebox <command> --help'.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available CLI subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Show a random quote
    #[command(long_about = "Picks a quote uniformly at random, optionally from one category.\n\
        The chosen category is remembered and used the next time no\n\
        category is given. Use 'all' to clear it.")]
    Show(commands::show::Args),

    /// Add a quote to the book
    #[command(long_about = "Adds a quote with an optional category. Blank text is rejected\n\
        and a missing category is stored as Uncategorized.")]
    Add(commands::add::Args),

    /// List quotes
    #[command(long_about = "Displays the quotes in the book in insertion order, optionally\n\
        filtered by category.")]
    List(commands::list::Args),

    /// List categories
    #[command(long_about = "Displays the distinct categories in the book with quote counts.\n\
        The remembered filter is marked with '*'.")]
    Categories(commands::categories::Args),

    /// Import quotes from a JSON file
    #[command(long_about = "Appends quotes from a JSON array of {text, category} objects.\n\
        Entries without text are skipped. Nothing is imported if no entry\n\
        is valid.")]
    Import(commands::import::Args),

    /// Export quotes to a JSON file
    #[command(long_about = "Writes every quote as a pretty-printed JSON array, to a file or\n\
        to standard output.")]
    Export(commands::export::Args),

    /// Reconcile once with the remote source
    #[command(long_about = "Fetches a snapshot from the configured remote and merges it into\n\
        the book. Remote-only quotes are added and category conflicts are\n\
        resolved in favour of the remote. Local-only quotes are kept.")]
    Sync(commands::sync::Args),

    /// Send local quotes to the remote source
    #[command(long_about = "Posts every local quote to the configured remote. Pushing does not\n\
        change the local book.")]
    Push,

    /// Reconcile periodically until interrupted
    #[command(long_about = "Runs one sync immediately and then one every interval until\n\
        Ctrl+C. Overlapping cycles are skipped. Logs are also written to\n\
        sync.log in the data directory.")]
    Watch(commands::watch::Args),

    /// Show book and sync status
    #[command(long_about = "Displays quote and category counts, the remembered filter,\n\
        the configured remote, and the result of the last sync.")]
    Status,

    /// View and manage configuration settings
    #[command(long_about = "Provides subcommands to show, get, and set configuration values.\n\
        Configuration is stored in ~/.quotebox/config.yaml.")]
    Config(commands::config::Args),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging(cli.verbose, matches!(cli.command, Commands::Watch(_)));

    match cli.command {
        Commands::Show(args) => commands::show::run(args),
        Commands::Add(args) => commands::add::run(args),
        Commands::List(args) => commands::list::run(args),
        Commands::Categories(args) => commands::categories::run(args),
        Commands::Import(args) => commands::import::run(args),
        Commands::Export(args) => commands::export::run(args),
        Commands::Sync(args) => commands::sync::run(args),
        Commands::Push => commands::push::run(),
        Commands::Watch(args) => commands::watch::run(args),
        Commands::Status => commands::status::run(),
        Commands::Config(args) => commands::config::run(args),
    }
}

/// Initializes logging to stderr, plus `sync.log` in the data directory
/// when `to_file` is set.
///
/// Returns a guard that must be kept alive while the file layer is in use.
fn init_logging(verbose: bool, to_file: bool) -> Option<WorkerGuard> {
    let filter = if verbose {
        "quotebox_cli=debug,quotebox=debug"
    } else {
        "quotebox_cli=info,quotebox=info"
    };

    let (file_layer, guard) = match to_file.then(open_log_dir).flatten() {
        Some(dir) => {
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, "sync.log"));
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    guard
}

fn open_log_dir() -> Option<std::path::PathBuf> {
    let dir = quotebox_cli::config::data_dir().ok()?;
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir)
}
