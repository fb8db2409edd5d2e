//! The quote collection and the read-side operations over it.
//!
//! # Submodules
//!
//! - `store` - ordered in-memory collection with validated load/save
//! - `select` - category index, filtering and random selection
//! - `interchange` - JSON import/export file format

pub mod interchange;
pub mod select;
pub mod store;

pub use interchange::{export_json, parse_import, ImportBatch};
pub use select::{categories_of, filter, is_all_filter, pick_random, ALL_CATEGORIES};
pub use store::{LoadReport, QuoteStore};

/// Errors from user-driven quote operations.
#[derive(Debug, thiserror::Error)]
pub enum QuoteError {
    /// The quote failed validation (e.g. empty text).
    #[error("Invalid quote: {0}")]
    Validation(String),

    /// An import file was not a usable quote list.
    #[error("Invalid import file: {0}")]
    ImportFormat(String),
}
