//! One sync cycle against a remote source.
//!
//! A cycle fetches a snapshot without holding the book lock, then takes
//! the lock to merge and persist. A busy flag makes overlapping triggers
//! return [`SyncOutcome::Skipped`] instead of running a second merge.

use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::ReconciliationSummary;
use crate::book::SharedBook;
use crate::remote::{PushReceipt, RemoteError, RemoteSource};

/// What a sync trigger did.
#[derive(Debug)]
pub enum SyncOutcome {
    /// The cycle ran and merged the snapshot.
    Completed(ReconciliationSummary),
    /// Another cycle was in flight; nothing was done.
    Skipped,
    /// The remote failed; the book was not touched.
    Failed(RemoteError),
}

impl SyncOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, SyncOutcome::Completed(_))
    }

    pub fn summary(&self) -> Option<&ReconciliationSummary> {
        match self {
            SyncOutcome::Completed(summary) => Some(summary),
            _ => None,
        }
    }
}

pub struct SyncEngine {
    book: SharedBook,
    remote: Arc<dyn RemoteSource>,
    busy: AtomicBool,
}

/// Clears the busy flag when a cycle ends, however it ends.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl SyncEngine {
    pub fn new(book: SharedBook, remote: Arc<dyn RemoteSource>) -> Self {
        Self {
            book,
            remote,
            busy: AtomicBool::new(false),
        }
    }

    pub fn book(&self) -> &SharedBook {
        &self.book
    }

    pub fn remote_name(&self) -> &str {
        self.remote.name()
    }

    /// True while a cycle is in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Runs one reconciliation cycle.
    ///
    /// Returns `Skipped` without touching the remote if a cycle is already
    /// running.
    pub async fn sync_once(&self) -> SyncOutcome {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!("Sync already in progress, skipping trigger");
            return SyncOutcome::Skipped;
        }
        let _guard = BusyGuard(&self.busy);

        let snapshot = match self.remote.fetch().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!("Sync with {} failed: {e}", self.remote.name());
                return SyncOutcome::Failed(e);
            }
        };
        tracing::debug!("Fetched {} remote records", snapshot.len());

        let mut book = self.book.lock().await;
        let summary = book.apply_snapshot(&snapshot);
        book.record_sync(Utc::now(), &summary);

        tracing::info!("Sync with {} completed: {}", self.remote.name(), summary.headline());
        for change in &summary.changes {
            tracing::debug!("{}", change);
        }

        SyncOutcome::Completed(summary)
    }

    /// Sends every local quote to the remote.
    ///
    /// Runs independently of reconciliation and never changes the book.
    pub async fn push(&self) -> Result<PushReceipt, RemoteError> {
        let quotes = self.book.lock().await.store().all();
        let receipt = self.remote.push(&quotes).await?;
        tracing::info!(
            "Pushed {} quotes to {} ({} accepted)",
            quotes.len(),
            self.remote.name(),
            receipt.accepted
        );
        Ok(receipt)
    }
}
