//! Search service: normalize, then filter
//!
//! Normalizer failures are recovered silently by filtering with the raw
//! lower-cased query instead; the user never sees a search error.

use crate::search::filter::filter_tracks;
use crate::search::normalizer::{QueryNormalizer, SearchIntent};
use hifier_common::Track;
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

/// Search result set plus how the query was interpreted
#[derive(Debug, Serialize)]
pub struct SearchOutcome {
    /// The query the filter actually ran with (corrected or raw)
    pub effective_query: String,
    /// Intent label, absent when the normalizer was skipped or failed
    pub intent: Option<SearchIntent>,
    /// True when the normalizer failed and the raw query was used
    pub fallback: bool,
    pub results: Vec<Track>,
}

pub struct SearchService {
    normalizer: Arc<dyn QueryNormalizer>,
}

impl SearchService {
    pub fn new(normalizer: Arc<dyn QueryNormalizer>) -> Self {
        Self { normalizer }
    }

    /// Run a search over the in-memory catalog snapshot.
    ///
    /// Blank queries return the whole snapshot without touching the
    /// normalizer (browse behavior).
    pub async fn search(&self, tracks: &[Track], raw_query: &str) -> SearchOutcome {
        if raw_query.trim().is_empty() {
            return SearchOutcome {
                effective_query: String::new(),
                intent: None,
                fallback: false,
                results: tracks.to_vec(),
            };
        }

        let (effective_query, intent, fallback) = match self.normalizer.normalize(raw_query).await {
            Ok(normalized) => (
                normalized.corrected_query.to_lowercase(),
                Some(normalized.search_intent),
                false,
            ),
            Err(e) => {
                warn!("Query normalization failed, falling back to raw query: {}", e);
                (raw_query.to_lowercase(), None, true)
            }
        };

        let results = filter_tracks(tracks, &effective_query)
            .into_iter()
            .cloned()
            .collect();

        SearchOutcome {
            effective_query,
            intent,
            fallback,
            results,
        }
    }
}
