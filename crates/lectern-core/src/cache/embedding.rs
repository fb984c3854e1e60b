//! Query-embedding memoization.

use std::sync::Arc;
use std::time::Duration;

use crate::error::LecternResult;
use crate::traits::Embedder;

use super::clock::Clock;
use super::ttl::{CacheStats, TtlCache, DEFAULT_TTL, MAX_CACHE_SIZE};

/// Memoizes query-text to embedding-vector lookups.
///
/// Keys are the verbatim query text. Provider failures are returned to
/// the caller, never cached; the caller decides how to degrade.
///
/// Concurrent identical misses are not coalesced: two simultaneous
/// lookups for the same uncached text may both call the provider. This
/// mirrors the observed behavior of the original system and is accepted
/// for a single-user corpus workload.
pub struct EmbeddingCache {
    cache: TtlCache<String, Vec<f32>>,
    embedder: Arc<dyn Embedder>,
}

impl EmbeddingCache {
    /// Create a cache with the default TTL (1 h) and capacity.
    pub fn new(embedder: Arc<dyn Embedder>, clock: Arc<dyn Clock>) -> Self {
        Self::with_limits(embedder, clock, DEFAULT_TTL, MAX_CACHE_SIZE)
    }

    /// Create a cache with explicit TTL and capacity.
    pub fn with_limits(
        embedder: Arc<dyn Embedder>,
        clock: Arc<dyn Clock>,
        ttl: Duration,
        capacity: usize,
    ) -> Self {
        Self {
            cache: TtlCache::with_limits(clock, ttl, capacity),
            embedder,
        }
    }

    /// Return the cached vector for `text`, or embed and cache it.
    pub async fn get_or_create(&self, text: &str) -> LecternResult<Vec<f32>> {
        if let Some(vector) = self.cache.get(&text.to_string()) {
            tracing::debug!(len = vector.len(), "embedding cache hit");
            return Ok(vector);
        }

        let vector = self.embedder.embed(text).await?;
        self.cache.insert(text.to_string(), vector.clone());
        Ok(vector)
    }

    /// Number of cached vectors.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Whether the cache holds no vectors.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Drop all cached vectors.
    pub fn clear(&self) {
        self.cache.clear();
    }

    /// Snapshot of the hit/miss/eviction counters.
    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::clock::ManualClock;
    use crate::error::LecternError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingEmbedder {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingEmbedder {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail,
            }
        }
    }

    #[async_trait]
    impl Embedder for CountingEmbedder {
        async fn embed(&self, text: &str) -> LecternResult<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(LecternError::embedding("provider down"));
            }
            Ok(vec![text.len() as f32, 1.0])
        }

        fn dimension(&self) -> usize {
            2
        }

        fn model_name(&self) -> &str {
            "counting"
        }
    }

    #[tokio::test]
    async fn test_two_lookups_one_provider_call() {
        let embedder = Arc::new(CountingEmbedder::new(false));
        let clock = Arc::new(ManualClock::starting_now());
        let cache = EmbeddingCache::new(embedder.clone(), clock.clone());

        let first = cache.get_or_create("neural networks").await.unwrap();
        clock.advance(Duration::from_secs(600));
        let second = cache.get_or_create("neural networks").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expiry_triggers_fresh_call() {
        let embedder = Arc::new(CountingEmbedder::new(false));
        let clock = Arc::new(ManualClock::starting_now());
        let cache = EmbeddingCache::new(embedder.clone(), clock.clone());

        cache.get_or_create("q").await.unwrap();
        clock.advance(Duration::from_secs(3601));
        cache.get_or_create("q").await.unwrap();

        assert_eq!(embedder.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failure_is_not_cached() {
        let embedder = Arc::new(CountingEmbedder::new(true));
        let clock = Arc::new(ManualClock::starting_now());
        let cache = EmbeddingCache::new(embedder.clone(), clock);

        assert!(cache.get_or_create("q").await.is_err());
        assert!(cache.get_or_create("q").await.is_err());
        assert!(cache.is_empty());
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 2);
    }
}
