//! Search relevance flow
//!
//! Raw query -> debounce -> language-model normalization (with silent
//! raw-query fallback) -> case-insensitive substring filter over the
//! catalog snapshot.

pub mod debounce;
pub mod filter;
pub mod normalizer;
pub mod service;

pub use debounce::{Debouncer, DEFAULT_DEBOUNCE};
pub use normalizer::{HttpNormalizer, NormalizedQuery, QueryNormalizer, SearchIntent};
pub use service::{SearchOutcome, SearchService};
