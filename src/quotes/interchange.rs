//! Quote file interchange format.
//!
//! A JSON array of `{ "text": string, "category"?: string }` objects.

use super::QuoteError;
use crate::storage::{Quote, QuoteRecord};

/// Quotes accepted from an import file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportBatch {
    pub quotes: Vec<Quote>,
    /// Entries rejected as malformed.
    pub skipped: usize,
}

/// Serializes quotes as a pretty-printed JSON array.
pub fn export_json(quotes: &[Quote]) -> serde_json::Result<String> {
    let records: Vec<QuoteRecord> = quotes.iter().map(QuoteRecord::from).collect();
    serde_json::to_string_pretty(&records)
}

/// Parses an import file.
///
/// Fails if the top level is not an array or if no entry is a valid quote.
pub fn parse_import(content: &str) -> Result<ImportBatch, QuoteError> {
    let value: serde_json::Value = serde_json::from_str(content)
        .map_err(|e| QuoteError::ImportFormat(format!("not valid JSON: {e}")))?;
    let entries = value
        .as_array()
        .ok_or_else(|| QuoteError::ImportFormat("expected a JSON array of quotes".to_string()))?;

    let quotes: Vec<Quote> = entries
        .iter()
        .filter_map(QuoteRecord::from_value)
        .filter_map(QuoteRecord::into_quote)
        .collect();

    if quotes.is_empty() {
        return Err(QuoteError::ImportFormat(
            "no valid quotes found (each entry needs a non-empty \"text\")".to_string(),
        ));
    }

    Ok(ImportBatch {
        skipped: entries.len() - quotes.len(),
        quotes,
    })
}
