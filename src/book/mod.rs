//! The quote book: owner of the quote store and its persistence.
//!
//! Every mutation path (user add, import, reconciliation) goes through a
//! `QuoteBook`. Callers that share one between tasks wrap it in a
//! [`SharedBook`] so those paths serialize on a single lock.
//!
//! Storage failures never abort an operation. They are logged and the book
//! carries on with its in-memory state.
//!
//! Several processes may share one database (a long-running `watch` next
//! to one-off `add` calls). Each mutation re-reads the stored collection
//! first and writes back the whole of it, so a write made by another
//! process since this book last saved is merged into, not overwritten.

use chrono::{DateTime, Utc};
use rand::Rng;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::quotes::{self, QuoteError, QuoteStore};
use crate::storage::{
    KeyValueStore, Quote, QuoteRecord, StorageError, KEY_LAST_FILTER, KEY_LAST_SYNC_AT, KEY_LAST_SYNC_SUMMARY,
    KEY_QUOTES,
};
use crate::sync::{reconcile, ReconciliationSummary};

/// A quote book shared between the CLI and the sync scheduler.
pub type SharedBook = Arc<Mutex<QuoteBook>>;

/// Result of importing a quote file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    /// Quotes appended to the book.
    pub imported: usize,
    /// Entries rejected as malformed.
    pub skipped: usize,
}

/// The last successful sync, as persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct LastSync {
    pub at: DateTime<Utc>,
    pub summary: Option<ReconciliationSummary>,
}

pub struct QuoteBook {
    store: QuoteStore,
    gateway: Arc<dyn KeyValueStore>,
    /// Set while the store holds changes the gateway refused.
    unsaved: AtomicBool,
}

impl QuoteBook {
    /// Opens the book persisted in `gateway`.
    ///
    /// First run (no stored collection) starts from the seed quotes and
    /// saves them. A stored collection that cannot be read also falls back
    /// to the seed quotes, without overwriting what is stored.
    pub fn open(gateway: Arc<dyn KeyValueStore>) -> Self {
        let mut store = QuoteStore::seeded();

        match gateway.get(KEY_QUOTES) {
            Ok(Some(persisted)) => match store.load(&persisted) {
                Ok(report) => {
                    tracing::debug!(
                        "Loaded {} quotes ({} dropped)",
                        report.loaded,
                        report.dropped
                    );
                }
                Err(e) => {
                    tracing::warn!("Ignoring stored quotes, using defaults: {e}");
                }
            },
            Ok(None) => {
                tracing::info!("No stored quotes, starting with {} defaults", store.len());
                let book = Self::with_store(store, gateway);
                book.persist();
                return book;
            }
            Err(e) => {
                tracing::warn!("Failed to read stored quotes, using defaults: {e}");
            }
        }

        Self::with_store(store, gateway)
    }

    fn with_store(store: QuoteStore, gateway: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            gateway,
            unsaved: AtomicBool::new(false),
        }
    }

    /// Wraps the book for sharing between tasks.
    pub fn into_shared(self) -> SharedBook {
        Arc::new(Mutex::new(self))
    }

    pub fn store(&self) -> &QuoteStore {
        &self.store
    }

    /// Adds a quote typed in by the user.
    pub fn add(&mut self, text: &str, category: &str) -> Result<Quote, QuoteError> {
        let quote = Quote::new(text.trim(), category.trim())
            .ok_or_else(|| QuoteError::Validation("quote text cannot be empty".to_string()))?;
        self.refresh();
        self.store.add(quote.clone());
        self.persist();
        Ok(quote)
    }

    /// Appends every valid quote from an import file.
    ///
    /// Duplicates of existing quotes are appended as-is; the next merge
    /// joins against the first occurrence.
    pub fn import(&mut self, content: &str) -> Result<ImportReport, QuoteError> {
        let batch = quotes::parse_import(content)?;
        let report = ImportReport {
            imported: batch.quotes.len(),
            skipped: batch.skipped,
        };
        self.refresh();
        for quote in batch.quotes {
            self.store.add(quote);
        }
        self.persist();
        Ok(report)
    }

    /// Exports the whole book in the interchange format.
    pub fn export(&self) -> serde_json::Result<String> {
        quotes::export_json(&self.store.all())
    }

    pub fn categories(&self) -> BTreeSet<String> {
        quotes::categories_of(&self.store)
    }

    pub fn filter(&self, category: Option<&str>) -> Vec<Quote> {
        quotes::filter(&self.store, category)
    }

    /// Picks a random quote from `category` (or all quotes).
    pub fn random<R: Rng + ?Sized>(&self, category: Option<&str>, rng: &mut R) -> Option<Quote> {
        let pool = self.filter(category);
        quotes::pick_random(&pool, rng).cloned()
    }

    /// The category filter the user last chose.
    pub fn last_filter(&self) -> Option<String> {
        match self.gateway.get(KEY_LAST_FILTER) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                tracing::warn!("Failed to read last filter: {e}");
                None
            }
        }
    }

    pub fn set_last_filter(&self, category: &str) {
        if let Err(e) = self.gateway.set(KEY_LAST_FILTER, category) {
            tracing::warn!("Failed to save last filter: {e}");
        }
    }

    /// Merges a remote snapshot and persists the store if it changed.
    pub fn apply_snapshot(&mut self, snapshot: &[QuoteRecord]) -> ReconciliationSummary {
        self.refresh();
        let summary = reconcile(&mut self.store, snapshot);
        if summary.has_changes() {
            self.persist();
        }
        summary
    }

    /// Remembers when the last sync completed and what it changed.
    pub fn record_sync(&self, at: DateTime<Utc>, summary: &ReconciliationSummary) {
        if let Err(e) = self.gateway.set(KEY_LAST_SYNC_AT, &at.to_rfc3339()) {
            tracing::warn!("Failed to save last sync time: {e}");
        }
        match serde_json::to_string(summary) {
            Ok(json) => {
                if let Err(e) = self.gateway.set(KEY_LAST_SYNC_SUMMARY, &json) {
                    tracing::warn!("Failed to save last sync summary: {e}");
                }
            }
            Err(e) => tracing::warn!("Failed to serialize sync summary: {e}"),
        }
    }

    /// Reads back the last recorded sync, if any.
    pub fn last_sync(&self) -> Result<Option<LastSync>, StorageError> {
        let Some(at) = self.gateway.get(KEY_LAST_SYNC_AT)? else {
            return Ok(None);
        };
        let at = DateTime::parse_from_rfc3339(&at)
            .map_err(|e| StorageError::Malformed(format!("last sync time: {e}")))?
            .with_timezone(&Utc);
        let summary = self
            .gateway
            .get(KEY_LAST_SYNC_SUMMARY)?
            .and_then(|json| serde_json::from_str(&json).ok());
        Ok(Some(LastSync { at, summary }))
    }

    /// Saves the store. Returns false (after logging) on failure.
    pub fn persist(&self) -> bool {
        let result = self
            .store
            .save()
            .and_then(|json| self.gateway.set(KEY_QUOTES, &json));
        let saved = match result {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to save quotes, continuing in memory: {e}");
                false
            }
        };
        self.unsaved.store(!saved, Ordering::SeqCst);
        saved
    }

    /// Replaces the in-memory store with the stored collection.
    ///
    /// Skipped while the store holds changes that could not be saved, and
    /// when the stored collection is missing or unreadable.
    fn refresh(&mut self) {
        if self.unsaved.load(Ordering::SeqCst) {
            tracing::debug!("Unsaved changes in memory, not reloading quotes");
            return;
        }
        match self.gateway.get(KEY_QUOTES) {
            Ok(Some(persisted)) => {
                let mut latest = QuoteStore::new();
                match latest.load(&persisted) {
                    Ok(_) => self.store = latest,
                    Err(e) => tracing::debug!("Keeping in-memory quotes: {e}"),
                }
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("Failed to reload quotes, using in-memory copy: {e}"),
        }
    }
}
