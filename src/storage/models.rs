//! Core data models for Quotebox
//!
//! A quote is the only entity. Records crossing a boundary (persisted
//! JSON, import files, remote payloads) are parsed into `QuoteRecord`
//! first and only become a `Quote` once their text has been validated.

use serde::{Deserialize, Serialize};

/// Category assigned to quotes that arrive without one.
pub const DEFAULT_CATEGORY: &str = "Uncategorized";

/// A single quote in the book.
///
/// `text` is the identity of the quote. `category` is always populated;
/// missing or blank categories are replaced with [`DEFAULT_CATEGORY`] when
/// the quote is built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quote {
    /// The quote itself
    pub text: String,

    /// Category used for filtering
    pub category: String,
}

impl Quote {
    /// Builds a quote, defaulting an empty category.
    ///
    /// Returns `None` when the text is empty after trimming.
    pub fn new(text: impl Into<String>, category: impl AsRef<str>) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return None;
        }
        Some(Self {
            text,
            category: normalize_category(Some(category.as_ref())),
        })
    }

    /// The reconciliation join key for this quote.
    pub fn key(&self) -> String {
        normalize_text(&self.text)
    }
}

impl std::fmt::Display for Quote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\" ({})", self.text, self.category)
    }
}

/// A quote-like record as it appears on the wire.
///
/// Used for the import/export file format, the persisted collection, and
/// remote snapshots after payload mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRecord {
    pub text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl QuoteRecord {
    pub fn new(text: impl Into<String>, category: Option<&str>) -> Self {
        Self {
            text: text.into(),
            category: category.map(str::to_string),
        }
    }

    /// Converts the record into a quote, or `None` if its text is blank.
    pub fn into_quote(self) -> Option<Quote> {
        let category = normalize_category(self.category.as_deref());
        Quote::new(self.text, category)
    }

    /// Tries to read a record out of an arbitrary JSON value.
    ///
    /// Anything that is not an object with a non-empty string `text` is
    /// rejected. A non-string `category` is treated as missing.
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        let obj = value.as_object()?;
        let text = obj.get("text")?.as_str()?;
        if text.trim().is_empty() {
            return None;
        }
        let category = obj.get("category").and_then(|c| c.as_str());
        Some(Self::new(text, category))
    }
}

impl From<&Quote> for QuoteRecord {
    fn from(quote: &Quote) -> Self {
        Self {
            text: quote.text.clone(),
            category: Some(quote.category.clone()),
        }
    }
}

/// Trims and lower-cases quote text for comparison.
pub fn normalize_text(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Returns the category, or [`DEFAULT_CATEGORY`] when missing or blank.
pub fn normalize_category(category: Option<&str>) -> String {
    match category.map(str::trim) {
        Some(c) if !c.is_empty() => c.to_string(),
        _ => DEFAULT_CATEGORY.to_string(),
    }
}
