//! Command-line interface for Quotebox.
//!
//! Provides the CLI commands for viewing, adding, importing and syncing
//! quotes. Each command opens the quote book from the default database.

/// Individual CLI command implementations.
pub mod commands;

/// Output format utilities.
pub mod format;

pub use format::OutputFormat;
