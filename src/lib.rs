//! Quotebox - a quote book that stays in step with a remote source
//!
//! Quotes live in a local SQLite key-value store and can be reconciled
//! against a remote snapshot on demand or on a timer. On a category
//! conflict the remote always wins.

pub mod book;
pub mod config;
pub mod quotes;
pub mod remote;
pub mod storage;
pub mod sync;
