//! In-memory quote collection.
//!
//! Insertion order is kept and survives a save/load round trip. Loading is
//! forgiving at the entry level (bad entries are dropped) but strict at the
//! top level (anything other than a JSON array leaves the store untouched).

use crate::storage::{Quote, QuoteRecord, StorageError};

/// Outcome of loading a persisted collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Entries accepted into the store.
    pub loaded: usize,
    /// Entries dropped as malformed.
    pub dropped: usize,
}

/// Ordered collection of quotes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteStore {
    quotes: Vec<Quote>,
}

impl QuoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The starter collection used on first run.
    pub fn seeded() -> Self {
        let seeds = [
            (
                "The only way to do great work is to love what you do.",
                "Motivation",
            ),
            (
                "Life is what happens when you're busy making other plans.",
                "Life",
            ),
            (
                "In the middle of difficulty lies opportunity.",
                "Inspiration",
            ),
            (
                "The unexamined life is not worth living.",
                "Philosophy",
            ),
            (
                "Simplicity is the ultimate sophistication.",
                "Wisdom",
            ),
        ];
        Self {
            quotes: seeds
                .iter()
                .filter_map(|(text, category)| Quote::new(*text, category))
                .collect(),
        }
    }

    /// Replaces the contents with the quotes found in `persisted`.
    ///
    /// `persisted` must be a JSON array. Entries that are not objects with a
    /// non-empty string `text` are dropped. If the array is non-empty but no
    /// entry survives, the current contents are kept and an error returned.
    pub fn load(&mut self, persisted: &str) -> Result<LoadReport, StorageError> {
        let value: serde_json::Value = serde_json::from_str(persisted)
            .map_err(|e| StorageError::Malformed(format!("quote collection: {e}")))?;
        let entries = value.as_array().ok_or_else(|| {
            StorageError::Malformed("quote collection is not an array".to_string())
        })?;

        let quotes: Vec<Quote> = entries
            .iter()
            .filter_map(QuoteRecord::from_value)
            .filter_map(QuoteRecord::into_quote)
            .collect();

        let report = LoadReport {
            loaded: quotes.len(),
            dropped: entries.len() - quotes.len(),
        };

        if quotes.is_empty() && !entries.is_empty() {
            return Err(StorageError::Malformed(format!(
                "quote collection has {} entries but none are valid",
                entries.len()
            )));
        }

        if report.dropped > 0 {
            tracing::debug!("Dropped {} malformed persisted quotes", report.dropped);
        }
        self.quotes = quotes;
        Ok(report)
    }

    /// Serializes the collection as a JSON array of records.
    pub fn save(&self) -> Result<String, StorageError> {
        let records: Vec<QuoteRecord> = self.quotes.iter().map(QuoteRecord::from).collect();
        serde_json::to_string(&records).map_err(|e| StorageError::Malformed(e.to_string()))
    }

    /// Appends a quote.
    pub fn add(&mut self, quote: Quote) {
        self.quotes.push(quote);
    }

    /// Returns a copy of every quote, in insertion order.
    pub fn all(&self) -> Vec<Quote> {
        self.quotes.clone()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Quote> {
        self.quotes.iter()
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Quote> {
        self.quotes.get_mut(index)
    }
}

impl FromIterator<Quote> for QuoteStore {
    fn from_iter<I: IntoIterator<Item = Quote>>(iter: I) -> Self {
        Self {
            quotes: iter.into_iter().collect(),
        }
    }
}
