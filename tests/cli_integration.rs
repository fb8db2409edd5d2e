//! Integration tests for Quotebox
//!
//! These tests exercise the commands through their underlying library
//! functions using temporary databases to ensure test isolation.

use quotebox_cli::book::QuoteBook;
use quotebox_cli::quotes::QuoteStore;
use quotebox_cli::remote::SimulatedRemote;
use quotebox_cli::storage::{Database, KeyValueStore, Quote, QuoteRecord, KEY_QUOTES};
use quotebox_cli::sync::{SyncEngine, SyncOutcome};
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

// =============================================================================
// Test Helpers
// =============================================================================

/// Creates a test database in a temporary directory.
/// Returns the Database instance and the temp directory (which must be kept alive).
fn create_test_db() -> (Arc<Database>, tempfile::TempDir) {
    let dir = tempdir().expect("Failed to create temp directory");
    let db_path = dir.path().join("test.db");
    let db = Database::open(&db_path).expect("Failed to open test database");
    (Arc::new(db), dir)
}

fn record(text: &str, category: &str) -> QuoteRecord {
    QuoteRecord::new(text, Some(category))
}

// =============================================================================
// Book Persistence Tests
// =============================================================================

mod book_tests {
    use super::*;

    #[test]
    fn test_first_open_seeds_and_persists() {
        let (db, _dir) = create_test_db();

        let book = QuoteBook::open(db.clone());

        assert_eq!(book.store(), &QuoteStore::seeded());
        assert!(
            db.get(KEY_QUOTES).unwrap().is_some(),
            "Seed quotes should be written on first run"
        );
    }

    #[test]
    fn test_added_quote_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("book.db");

        {
            let db = Arc::new(Database::open(&path).unwrap());
            let mut book = QuoteBook::open(db);
            book.add("Well begun is half done.", "Wisdom").unwrap();
        }

        let db = Arc::new(Database::open(&path).unwrap());
        let book = QuoteBook::open(db);
        assert_eq!(book.store().len(), QuoteStore::seeded().len() + 1);
        assert!(book
            .filter(Some("Wisdom"))
            .iter()
            .any(|q| q.text == "Well begun is half done."));
    }

    #[test]
    fn test_empty_text_is_rejected_and_not_stored() {
        let (db, _dir) = create_test_db();
        let mut book = QuoteBook::open(db.clone());

        assert!(book.add("   ", "Wisdom").is_err());

        let reopened = QuoteBook::open(db);
        assert_eq!(reopened.store(), &QuoteStore::seeded());
    }

    #[test]
    fn test_missing_category_defaults() {
        let (db, _dir) = create_test_db();
        let mut book = QuoteBook::open(db);

        let quote = book.add("No label", "").unwrap();
        assert_eq!(quote.category, "Uncategorized");
        assert!(book.categories().contains("Uncategorized"));
    }

    #[test]
    fn test_malformed_stored_quotes_fall_back_without_overwrite() {
        let (db, _dir) = create_test_db();
        db.set(KEY_QUOTES, "this is not json").unwrap();

        let book = QuoteBook::open(db.clone());

        assert_eq!(book.store(), &QuoteStore::seeded());
        assert_eq!(db.get(KEY_QUOTES).unwrap().as_deref(), Some("this is not json"));
    }

    #[test]
    fn test_empty_stored_array_means_empty_book() {
        let (db, _dir) = create_test_db();
        db.set(KEY_QUOTES, "[]").unwrap();

        let book = QuoteBook::open(db);
        assert!(book.store().is_empty());
        assert!(book.random(None, &mut rand::thread_rng()).is_none());
    }

    #[test]
    fn test_last_filter_is_remembered() {
        let (db, _dir) = create_test_db();
        {
            let book = QuoteBook::open(db.clone());
            assert_eq!(book.last_filter(), None);
            book.set_last_filter("Life");
        }

        let book = QuoteBook::open(db);
        assert_eq!(book.last_filter().as_deref(), Some("Life"));
    }

    #[test]
    fn test_random_respects_category() {
        let (db, _dir) = create_test_db();
        let book = QuoteBook::open(db);
        let mut rng = rand::thread_rng();

        for _ in 0..20 {
            let quote = book.random(Some("Life"), &mut rng).unwrap();
            assert_eq!(quote.category, "Life");
        }
        assert!(book.random(Some("Nope"), &mut rng).is_none());
    }
}

// =============================================================================
// Import / Export Tests
// =============================================================================

mod interchange_tests {
    use super::*;

    #[test]
    fn test_export_then_import_into_fresh_book() {
        let (db, _dir) = create_test_db();
        let mut source = QuoteBook::open(db);
        source.add("Exported", "Travel").unwrap();
        let json = source.export().unwrap();

        let (db, _dir2) = create_test_db();
        let mut target = QuoteBook::open(db);
        let before = target.store().len();
        let report = target.import(&json).unwrap();

        assert_eq!(report.imported, before + 1);
        assert_eq!(report.skipped, 0);
        assert!(target.categories().contains("Travel"));
    }

    #[test]
    fn test_import_skips_invalid_entries() {
        let (db, _dir) = create_test_db();
        let mut book = QuoteBook::open(db);

        let report = book
            .import(r#"[{"text": "Kept", "category": "A"}, {"category": "B"}, 42, {"text": "  "}]"#)
            .unwrap();

        assert_eq!(report.imported, 1);
        assert_eq!(report.skipped, 3);
    }

    #[test]
    fn test_import_with_no_valid_entries_changes_nothing() {
        let (db, _dir) = create_test_db();
        let mut book = QuoteBook::open(db);

        assert!(book.import(r#"[{"category": "B"}]"#).is_err());
        assert!(book.import("{}").is_err());
        assert!(book.import("not json").is_err());
        assert_eq!(book.store(), &QuoteStore::seeded());
    }
}

// =============================================================================
// Sync Tests
// =============================================================================

mod sync_tests {
    use super::*;

    fn engine_on(db: Arc<Database>, remote: Arc<SimulatedRemote>) -> SyncEngine {
        SyncEngine::new(QuoteBook::open(db).into_shared(), remote)
    }

    #[tokio::test]
    async fn test_sync_persists_merge_and_last_sync() {
        let (db, _dir) = create_test_db();
        let remote = Arc::new(SimulatedRemote::new(
            vec![
                record("Life is what happens when you're busy making other plans.", "Humor"),
                record("Fresh from the server", "Remote"),
            ],
            Duration::ZERO,
        ));
        let engine = engine_on(db.clone(), remote);

        let outcome = engine.sync_once().await;
        let summary = outcome.summary().expect("sync should complete");
        assert_eq!(summary.added, 1);
        assert_eq!(summary.conflicts_resolved, 1);

        let book = QuoteBook::open(db);
        assert!(book.categories().contains("Humor"));
        assert!(book.categories().contains("Remote"));
        assert!(!book.categories().contains("Life"));
        let last = book.last_sync().unwrap().expect("last sync recorded");
        assert_eq!(last.summary.as_ref(), Some(summary));
    }

    #[tokio::test]
    async fn test_repeated_sync_converges() {
        let (db, _dir) = create_test_db();
        let remote = Arc::new(SimulatedRemote::with_sample_data(Duration::ZERO));
        let engine = engine_on(db, remote);

        assert!(engine.sync_once().await.summary().unwrap().has_changes());
        let after_first = engine.book().lock().await.store().clone();

        let second = engine.sync_once().await;
        assert!(!second.summary().unwrap().has_changes());
        assert_eq!(engine.book().lock().await.store(), &after_first);
    }

    #[tokio::test]
    async fn test_local_only_quotes_survive_sync() {
        let (db, _dir) = create_test_db();
        let remote = Arc::new(SimulatedRemote::with_sample_data(Duration::ZERO));
        let engine = engine_on(db, remote);
        engine
            .book()
            .lock()
            .await
            .add("Only on this machine", "Local")
            .unwrap();

        engine.sync_once().await;

        let book = engine.book().lock().await;
        assert!(book
            .store()
            .iter()
            .any(|q| q == &Quote::new("Only on this machine", "Local").unwrap()));
    }

    #[tokio::test]
    async fn test_sync_keeps_quote_added_by_another_process() {
        let (db, _dir) = create_test_db();
        let remote = Arc::new(SimulatedRemote::new(
            vec![record("Remote new", "Remote")],
            Duration::ZERO,
        ));
        let engine = engine_on(db.clone(), remote);

        // A separate `quotebox add` writes to the same database while the
        // watcher holds its own copy of the book.
        let mut other = QuoteBook::open(db.clone());
        other.add("User typed this", "Mine").unwrap();

        assert!(engine.sync_once().await.is_completed());

        let reopened = QuoteBook::open(db);
        assert!(reopened.store().iter().any(|q| q.text == "User typed this"));
        assert!(reopened.store().iter().any(|q| q.text == "Remote new"));
        assert_eq!(reopened.store().len(), QuoteStore::seeded().len() + 2);
    }

    #[tokio::test]
    async fn test_failed_sync_does_not_touch_database() {
        let (db, _dir) = create_test_db();
        let remote = Arc::new(SimulatedRemote::with_sample_data(Duration::ZERO));
        remote.set_failing(true);
        let engine = engine_on(db.clone(), remote);
        let stored_before = db.get(KEY_QUOTES).unwrap();

        assert!(matches!(engine.sync_once().await, SyncOutcome::Failed(_)));

        assert_eq!(db.get(KEY_QUOTES).unwrap(), stored_before);
        assert!(QuoteBook::open(db).last_sync().unwrap().is_none());
    }
}
