//! HTTP remote source.
//!
//! Talks to a JSONPlaceholder-style posts API: `GET /posts` returns an
//! array of `{userId, id, title, body}` objects, `POST /posts` accepts
//! arbitrary JSON and echoes it back with a new id.

use chrono::Utc;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use super::{records_from_payload, FetchFuture, PushFuture, PushReceipt, RemoteError, RemoteSource};
use crate::storage::{Quote, QuoteRecord};

/// Number of posts requested per fetch.
const FETCH_LIMIT: usize = 10;

/// Remote source backed by an HTTP endpoint.
pub struct HttpRemote {
    /// HTTP client instance.
    client: Client,
    /// Base URL of the service.
    base_url: String,
}

/// Request payload for pushing quotes.
#[derive(Debug, Serialize)]
struct PushRequest<'a> {
    quotes: Vec<QuoteRecord>,
    source: &'a str,
}

impl HttpRemote {
    /// Creates a client for `base_url` with a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RemoteError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn posts_url(&self) -> String {
        format!("{}/posts", self.base_url)
    }

    async fn fetch_records(&self) -> Result<Vec<QuoteRecord>, RemoteError> {
        let url = format!("{}?_limit={}", self.posts_url(), FETCH_LIMIT);
        tracing::debug!("Fetching remote quotes from {}", url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RemoteError::Server { status, message });
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| RemoteError::MalformedPayload(e.to_string()))?;
        records_from_payload(&payload)
    }

    async fn push_records(&self, quotes: &[Quote]) -> Result<PushReceipt, RemoteError> {
        let payload = PushRequest {
            quotes: quotes.iter().map(QuoteRecord::from).collect(),
            source: "quotebox",
        };

        let response = self
            .client
            .post(self.posts_url())
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RemoteError::Server { status, message });
        }

        Ok(PushReceipt {
            accepted: quotes.len(),
            received_at: Utc::now(),
        })
    }
}

impl RemoteSource for HttpRemote {
    fn name(&self) -> &str {
        "http"
    }

    fn fetch(&self) -> FetchFuture<'_> {
        Box::pin(self.fetch_records())
    }

    fn push<'a>(&'a self, quotes: &'a [Quote]) -> PushFuture<'a> {
        Box::pin(self.push_records(quotes))
    }
}
