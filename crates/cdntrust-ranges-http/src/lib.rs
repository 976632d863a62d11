// # HTTP Range Source
//
// This crate provides the HTTP-based range source for the trusted-range
// system.
//
// ## Transport Policy
//
// The update engine tolerates per-endpoint failures and skips them, so the
// transport stays deliberately simple: one GET per fetch, a fixed request
// timeout, no retries. Error statuses, unreadable bodies and JSON decode
// failures all surface as fetch errors for the engine to skip.
//
// Endpoints are fetched sequentially; the timeout bounds how long a hanging
// endpoint can delay the run.

use cdntrust_core::traits::RangeSource;
use cdntrust_core::{Error, Result};
use serde_json::Value;
use std::time::Duration;

/// Default request timeout for range document fetches
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP range document source
pub struct HttpRangeSource {
    client: reqwest::Client,
}

impl HttpRangeSource {
    /// Create a source with the default request timeout
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a source with a custom request timeout
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
        }
    }
}

impl Default for HttpRangeSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl RangeSource for HttpRangeSource {
    async fn fetch(&self, url: &str) -> Result<Value> {
        tracing::debug!(%url, "fetching range document");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::fetch(format!("request to {url} failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::fetch(format!(
                "{url} answered with HTTP {}",
                response.status()
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| Error::fetch(format!("failed to decode document from {url}: {e}")))
    }
}
