//! In-memory remote with artificial latency.
//!
//! Holds a server-side list of records, sleeps before answering, and can
//! be switched into a failing mode to exercise error paths.

use chrono::Utc;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use super::{FetchFuture, PushFuture, PushReceipt, RemoteError, RemoteSource};
use crate::storage::{normalize_text, Quote, QuoteRecord};

pub struct SimulatedRemote {
    records: RwLock<Vec<QuoteRecord>>,
    latency: Duration,
    failing: AtomicBool,
    fetches: AtomicUsize,
}

impl SimulatedRemote {
    pub fn new(records: Vec<QuoteRecord>, latency: Duration) -> Self {
        Self {
            records: RwLock::new(records),
            latency,
            failing: AtomicBool::new(false),
            fetches: AtomicUsize::new(0),
        }
    }

    /// A server that disagrees with the seed collection on one category
    /// and knows a few quotes the seed does not.
    pub fn with_sample_data(latency: Duration) -> Self {
        let records = vec![
            QuoteRecord::new(
                "The only way to do great work is to love what you do.",
                Some("Work"),
            ),
            QuoteRecord::new(
                "Simplicity is the ultimate sophistication.",
                Some("Wisdom"),
            ),
            QuoteRecord::new("Well done is better than well said.", Some("Action")),
            QuoteRecord::new(
                "Knowing yourself is the beginning of all wisdom.",
                Some("Wisdom"),
            ),
            QuoteRecord::new("Whatever you are, be a good one.", None),
        ];
        Self::new(records, latency)
    }

    /// Returns a copy of the server-side records.
    pub fn records(&self) -> Vec<QuoteRecord> {
        self.records
            .read()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Makes every request fail until switched back.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of fetches served (including failed ones).
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    async fn respond(&self) -> Result<(), RemoteError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(RemoteError::Unavailable(
                "simulated server is down".to_string(),
            ));
        }
        Ok(())
    }

    async fn fetch_records(&self) -> Result<Vec<QuoteRecord>, RemoteError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.respond().await?;
        self.records
            .read()
            .map(|r| r.clone())
            .map_err(|_| RemoteError::Unavailable("server state poisoned".to_string()))
    }

    /// Stores pushed quotes the server does not know yet. Existing
    /// server records keep their category.
    async fn accept_push(&self, quotes: &[Quote]) -> Result<PushReceipt, RemoteError> {
        self.respond().await?;
        let mut records = self
            .records
            .write()
            .map_err(|_| RemoteError::Unavailable("server state poisoned".to_string()))?;

        let mut known: HashSet<String> = records.iter().map(|r| normalize_text(&r.text)).collect();
        let mut accepted = 0;
        for quote in quotes {
            if known.insert(quote.key()) {
                records.push(QuoteRecord::from(quote));
                accepted += 1;
            }
        }

        Ok(PushReceipt {
            accepted,
            received_at: Utc::now(),
        })
    }
}

impl RemoteSource for SimulatedRemote {
    fn name(&self) -> &str {
        "simulated"
    }

    fn fetch(&self) -> FetchFuture<'_> {
        Box::pin(self.fetch_records())
    }

    fn push<'a>(&'a self, quotes: &'a [Quote]) -> PushFuture<'a> {
        Box::pin(self.accept_push(quotes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_returns_records() {
        let remote = SimulatedRemote::new(vec![QuoteRecord::new("A", Some("X"))], Duration::ZERO);
        let records = remote.fetch().await.unwrap();
        assert_eq!(records, vec![QuoteRecord::new("A", Some("X"))]);
        assert_eq!(remote.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_failing_remote_errors() {
        let remote = SimulatedRemote::with_sample_data(Duration::ZERO);
        remote.set_failing(true);
        assert!(matches!(
            remote.fetch().await.unwrap_err(),
            RemoteError::Unavailable(_)
        ));

        remote.set_failing(false);
        assert!(remote.fetch().await.is_ok());
        assert_eq!(remote.fetch_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_waits_for_latency() {
        let remote = SimulatedRemote::new(vec![], Duration::from_secs(2));
        let started = tokio::time::Instant::now();
        remote.fetch().await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_push_adds_only_unknown_quotes() {
        let remote = SimulatedRemote::new(vec![QuoteRecord::new("A", Some("X"))], Duration::ZERO);
        let quotes = vec![
            Quote::new(" a ", "Other").unwrap(),
            Quote::new("B", "Y").unwrap(),
        ];

        let receipt = remote.push(&quotes).await.unwrap();
        assert_eq!(receipt.accepted, 1);

        let records = remote.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].category.as_deref(), Some("X"));
        assert_eq!(records[1], QuoteRecord::new("B", Some("Y")));
    }
}
