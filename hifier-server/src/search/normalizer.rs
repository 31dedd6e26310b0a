//! Query normalization client
//!
//! The language-model service takes a raw free-text query and returns a
//! corrected/expanded query plus a coarse intent label. The call is
//! fallible and non-deterministic; callers are expected to fall back to
//! the raw query when it fails (see `search::service`).

use async_trait::async_trait;
use hifier_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Coarse classification of what the user is searching for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchIntent {
    Artist,
    Album,
    Song,
    General,
}

/// Normalizer output: corrected query plus inferred intent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedQuery {
    #[serde(rename = "correctedQuery")]
    pub corrected_query: String,
    #[serde(rename = "searchIntent")]
    pub search_intent: SearchIntent,
}

/// Request body for the normalization service
#[derive(Debug, Serialize)]
struct NormalizeRequest<'a> {
    query: &'a str,
}

/// Seam for the external normalization service, mockable in tests.
#[async_trait]
pub trait QueryNormalizer: Send + Sync {
    async fn normalize(&self, query: &str) -> Result<NormalizedQuery>;
}

/// HTTP client for the query-normalization service.
///
/// No retries and no caching: the service gives no idempotence guarantee,
/// and call volume is already bounded by the consumer's debounce.
pub struct HttpNormalizer {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpNormalizer {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }

    /// Variant with a connect timeout; no overall request timeout is
    /// enforced (a slow call just delays result application).
    pub fn with_connect_timeout(endpoint: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .build()
            .map_err(|e| Error::Search(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl QueryNormalizer for HttpNormalizer {
    async fn normalize(&self, query: &str) -> Result<NormalizedQuery> {
        debug!("Normalizing query: {:?}", query);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&NormalizeRequest { query })
            .send()
            .await
            .map_err(|e| Error::Search(format!("Normalizer request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Search(format!(
                "Normalizer returned status {}",
                response.status()
            )));
        }

        response
            .json::<NormalizedQuery>()
            .await
            .map_err(|e| Error::Search(format!("Invalid normalizer response: {}", e)))
    }
}
