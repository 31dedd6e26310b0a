//! Search debouncing
//!
//! Bounds normalizer call volume: an invocation only proceeds once its
//! input has been quiescent for the window. Supersession is implicit.
//! Each new input bumps a generation counter, and an older invocation
//! finding the counter moved on simply discards itself. Only the latest
//! input's result is ever applied; there is no explicit cancellation
//! token.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Default quiescence window, matching the browser-side input debounce.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

pub struct Debouncer {
    window: Duration,
    generation: AtomicU64,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            generation: AtomicU64::new(0),
        }
    }

    /// Wait out the quiescence window for `input`.
    ///
    /// Returns `Some(input)` if no newer input arrived while waiting,
    /// `None` if this invocation was superseded and its result must be
    /// discarded.
    pub async fn settle<T>(&self, input: T) -> Option<T> {
        let my_generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.window).await;
        if self.generation.load(Ordering::SeqCst) == my_generation {
            Some(input)
        } else {
            None
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sole_input_settles() {
        let debouncer = Debouncer::new(Duration::from_millis(10));
        assert_eq!(debouncer.settle("query").await, Some("query"));
    }

    #[tokio::test]
    async fn superseded_input_is_discarded() {
        let debouncer = std::sync::Arc::new(Debouncer::new(Duration::from_millis(50)));

        let first = {
            let debouncer = std::sync::Arc::clone(&debouncer);
            tokio::spawn(async move { debouncer.settle("first").await })
        };
        // Let the first invocation register before superseding it
        tokio::time::sleep(Duration::from_millis(10)).await;
        let second = {
            let debouncer = std::sync::Arc::clone(&debouncer);
            tokio::spawn(async move { debouncer.settle("second").await })
        };

        assert_eq!(first.await.unwrap(), None);
        assert_eq!(second.await.unwrap(), Some("second"));
    }
}
