//! Remote quote sources.
//!
//! A remote source hands out snapshots of quote-like records and accepts
//! pushes of the local collection. Both operations are fallible and
//! asynchronous regardless of backend.
//!
//! # Submodules
//!
//! - `http` - placeholder posts API over HTTP
//! - `simulated` - in-memory server with artificial latency

pub mod http;
pub mod simulated;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{Config, RemoteKind};
use crate::storage::{Quote, QuoteRecord};

pub use http::HttpRemote;
pub use simulated::SimulatedRemote;

/// Errors from talking to a remote source.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// HTTP request error.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned an error response.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// The payload was not a list of records.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// The source could not be reached.
    #[error("Remote unavailable: {0}")]
    Unavailable(String),
}

/// Acknowledgement of a push.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushReceipt {
    /// Number of quotes the remote accepted.
    pub accepted: usize,
    /// When the remote acknowledged the push.
    pub received_at: DateTime<Utc>,
}

pub type FetchFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<QuoteRecord>, RemoteError>> + Send + 'a>>;
pub type PushFuture<'a> = Pin<Box<dyn Future<Output = Result<PushReceipt, RemoteError>> + Send + 'a>>;

/// A source of remote quote snapshots.
pub trait RemoteSource: Send + Sync {
    /// Short label used in logs and status output.
    fn name(&self) -> &str;

    /// Fetches the current snapshot.
    ///
    /// Implementations drop malformed records before returning; a payload
    /// that is not a list at all is an error.
    fn fetch(&self) -> FetchFuture<'_>;

    /// Sends the local collection to the remote.
    fn push<'a>(&'a self, quotes: &'a [Quote]) -> PushFuture<'a>;
}

/// Builds the remote source selected in the config.
pub fn from_config(config: &Config) -> Result<Arc<dyn RemoteSource>, RemoteError> {
    let remote: Arc<dyn RemoteSource> = match config.remote {
        RemoteKind::Simulated => Arc::new(SimulatedRemote::with_sample_data(
            Duration::from_millis(config.simulated_latency_ms),
        )),
        RemoteKind::Http => Arc::new(HttpRemote::new(
            &config.remote_url,
            Duration::from_secs(config.http_timeout_secs),
        )?),
    };
    Ok(remote)
}

/// Maps a raw remote payload into quote records.
///
/// Accepts objects carrying `text` or `title` for the quote text and
/// `category` or a numeric `userId` for the category. Anything else in the
/// array is dropped.
pub fn records_from_payload(payload: &serde_json::Value) -> Result<Vec<QuoteRecord>, RemoteError> {
    let entries = payload.as_array().ok_or_else(|| {
        RemoteError::MalformedPayload("expected a JSON array of records".to_string())
    })?;

    let records: Vec<QuoteRecord> = entries.iter().filter_map(record_from_entry).collect();
    let dropped = entries.len() - records.len();
    if dropped > 0 {
        tracing::debug!("Dropped {} malformed remote records", dropped);
    }
    Ok(records)
}

fn record_from_entry(entry: &serde_json::Value) -> Option<QuoteRecord> {
    let obj = entry.as_object()?;
    let text = obj
        .get("text")
        .or_else(|| obj.get("title"))
        .and_then(|v| v.as_str())?;

    let category = match obj.get("category").and_then(|v| v.as_str()) {
        Some(c) => Some(c.to_string()),
        None => obj
            .get("userId")
            .and_then(|v| v.as_u64())
            .map(|id| format!("User {id}")),
    };

    Some(QuoteRecord {
        text: text.to_string(),
        category,
    })
}
