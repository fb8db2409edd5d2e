//! CLI commands for Quotebox.
//!
//! Each submodule implements a single CLI command with its argument
//! parsing and execution logic.

use anyhow::{Context, Result};
use std::sync::Arc;

use quotebox_cli::book::QuoteBook;
use quotebox_cli::storage::Database;

/// Add a quote to the book.
pub mod add;

/// List the categories in the book.
pub mod categories;

/// Configuration viewing and management.
pub mod config;

/// Export the book to a JSON file.
pub mod export;

/// Import quotes from a JSON file.
pub mod import;

/// List quotes, optionally filtered by category.
pub mod list;

/// Push local quotes to the remote source.
pub mod push;

/// Show a random quote.
pub mod show;

/// Show book and sync status.
pub mod status;

/// Reconcile once with the remote source.
pub mod sync;

/// Keep reconciling on a timer until interrupted.
pub mod watch;

/// Opens the quote book stored in the default database.
pub(crate) fn open_book() -> Result<QuoteBook> {
    let db = Database::open_default().context("Could not open database")?;
    Ok(QuoteBook::open(Arc::new(db)))
}

/// Builds a tokio runtime for commands that talk to the remote.
pub(crate) fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().context("Failed to create tokio runtime")
}
