//! Storage layer for Quotebox
//!
//! The persistence gateway is a plain string key-value store. The quote
//! book serializes its collection and a few markers (last filter, last
//! sync) under the keys below.

pub mod db;
pub mod memory;
pub mod models;

pub use db::Database;
pub use memory::MemoryStore;
pub use models::*;

/// Key holding the JSON array of quotes.
pub const KEY_QUOTES: &str = "quotes";

/// Key holding the last category filter chosen by the user.
pub const KEY_LAST_FILTER: &str = "last_filter";

/// Key holding the RFC 3339 timestamp of the last successful sync.
pub const KEY_LAST_SYNC_AT: &str = "last_sync_at";

/// Key holding the JSON summary of the last successful sync.
pub const KEY_LAST_SYNC_SUMMARY: &str = "last_sync_summary";

/// Errors raised by a persistence backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// SQLite failure.
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Filesystem failure while preparing the store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored value could not be (de)serialized.
    #[error("Stored value is malformed: {0}")]
    Malformed(String),

    /// The backend lock was poisoned by a panicking writer.
    #[error("Storage backend is unavailable")]
    Poisoned,
}

/// A string key-value persistence gateway.
///
/// Implementations must be shareable across tasks; the quote book holds
/// one behind an `Arc`.
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display() {
        let err = StorageError::Malformed("not an array".to_string());
        assert!(err.to_string().contains("not an array"));
        assert!(StorageError::Poisoned.to_string().contains("unavailable"));
    }

    #[test]
    fn test_keys_are_distinct() {
        let keys = [KEY_QUOTES, KEY_LAST_FILTER, KEY_LAST_SYNC_AT, KEY_LAST_SYNC_SUMMARY];
        let unique: std::collections::HashSet<_> = keys.iter().collect();
        assert_eq!(unique.len(), keys.len());
    }
}
