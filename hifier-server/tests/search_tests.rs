//! Search flow tests
//!
//! Covers normalizer-corrected matching, the silent raw-query fallback,
//! and debounce supersession.

use async_trait::async_trait;
use chrono::Utc;
use hifier_common::{Error, Result, Track};
use hifier_server::search::{
    Debouncer, NormalizedQuery, QueryNormalizer, SearchIntent, SearchService,
};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

fn track(title: &str, artists: &[&str], album: &str) -> Track {
    Track {
        id: Uuid::new_v4(),
        title: title.to_string(),
        artists: artists.iter().map(|s| s.to_string()).collect(),
        album: album.to_string(),
        cover_url: "https://covers.example/c.png".to_string(),
        music_url: "https://media.example/t.flac".to_string(),
        user_id: "u1".to_string(),
        user_name: "Uploader".to_string(),
        created_at: Utc::now(),
        metadata: None,
    }
}

/// Normalizer stub with a fixed correction table
struct FixedNormalizer {
    corrected: String,
    intent: SearchIntent,
}

#[async_trait]
impl QueryNormalizer for FixedNormalizer {
    async fn normalize(&self, _query: &str) -> Result<NormalizedQuery> {
        Ok(NormalizedQuery {
            corrected_query: self.corrected.clone(),
            search_intent: self.intent,
        })
    }
}

/// Normalizer stub that always fails
struct BrokenNormalizer;

#[async_trait]
impl QueryNormalizer for BrokenNormalizer {
    async fn normalize(&self, _query: &str) -> Result<NormalizedQuery> {
        Err(Error::Search("model unavailable".to_string()))
    }
}

fn catalog() -> Vec<Track> {
    vec![
        track("Good Luck, Babe!", &["Chappell Roan"], "Singles"),
        track("Pink Pony Club", &["Chappell Roan"], "The Rise and Fall"),
        track("Other Song", &["Someone Else"], "Elsewhere"),
    ]
}

#[tokio::test]
async fn corrected_query_matches_where_raw_would_not() {
    let service = SearchService::new(Arc::new(FixedNormalizer {
        corrected: "chappell roan".to_string(),
        intent: SearchIntent::Artist,
    }));
    let tracks = catalog();

    // The misspelled raw query matches nothing by substring...
    let raw_hits: Vec<&Track> = tracks
        .iter()
        .filter(|t| {
            t.artists
                .iter()
                .any(|a| a.to_lowercase().contains("chapell roan"))
        })
        .collect();
    assert!(raw_hits.is_empty());

    // ...but the normalized query finds both Chappell Roan tracks
    let outcome = service.search(&tracks, "chapell roan").await;
    assert_eq!(outcome.results.len(), 2);
    assert_eq!(outcome.intent, Some(SearchIntent::Artist));
    assert!(!outcome.fallback);
    assert_eq!(outcome.effective_query, "chappell roan");
}

#[tokio::test]
async fn normalizer_failure_falls_back_to_raw_query() {
    let service = SearchService::new(Arc::new(BrokenNormalizer));
    let tracks = catalog();

    let outcome = service.search(&tracks, "Pink Pony").await;

    assert!(outcome.fallback);
    assert!(outcome.intent.is_none());
    assert_eq!(outcome.results.len(), 1);
    assert_eq!(outcome.results[0].title, "Pink Pony Club");
}

#[tokio::test]
async fn failed_normalizer_and_no_raw_match_yields_empty_not_error() {
    let service = SearchService::new(Arc::new(BrokenNormalizer));
    let tracks = catalog();

    let outcome = service.search(&tracks, "zzzz no such thing").await;

    assert!(outcome.fallback);
    assert!(outcome.results.is_empty());
}

#[tokio::test]
async fn blank_query_returns_snapshot_without_normalizing() {
    // BrokenNormalizer would poison the result if it were consulted
    let service = SearchService::new(Arc::new(BrokenNormalizer));
    let tracks = catalog();

    let outcome = service.search(&tracks, "   ").await;

    assert!(!outcome.fallback);
    assert_eq!(outcome.results.len(), tracks.len());
}

#[tokio::test]
async fn debounce_applies_only_latest_input() {
    let debouncer = Arc::new(Debouncer::new(Duration::from_millis(40)));

    let stale = {
        let debouncer = Arc::clone(&debouncer);
        tokio::spawn(async move { debouncer.settle("chap").await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;
    let latest = {
        let debouncer = Arc::clone(&debouncer);
        tokio::spawn(async move { debouncer.settle("chapell roan").await })
    };

    assert_eq!(stale.await.unwrap(), None);
    assert_eq!(latest.await.unwrap(), Some("chapell roan"));
}
