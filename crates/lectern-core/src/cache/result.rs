//! Whole-retrieval memoization.

use std::sync::Arc;
use std::time::Duration;

use crate::types::{Retrieval, SearchRequest};

use super::clock::Clock;
use super::ttl::{CacheStats, TtlCache, DEFAULT_TTL, MAX_CACHE_SIZE};

/// Memoizes full [`Retrieval`] objects keyed by the canonical
/// serialization of (query, owner, narrowing, mode, top_k).
pub struct ResultCache {
    cache: TtlCache<String, Retrieval>,
}

impl ResultCache {
    /// Create a cache with the default TTL (1 h) and capacity.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_limits(clock, DEFAULT_TTL, MAX_CACHE_SIZE)
    }

    /// Create a cache with explicit TTL and capacity.
    pub fn with_limits(clock: Arc<dyn Clock>, ttl: Duration, capacity: usize) -> Self {
        Self {
            cache: TtlCache::with_limits(clock, ttl, capacity),
        }
    }

    /// Look up a cached retrieval. Expired entries read as absent.
    pub fn get(&self, request: &SearchRequest) -> Option<Retrieval> {
        self.cache.get(&request.cache_key())
    }

    /// Cache a retrieval with the default TTL.
    pub fn insert(&self, request: &SearchRequest, result: Retrieval) {
        self.cache.insert(request.cache_key(), result);
    }

    /// Cache a retrieval with an explicit TTL.
    pub fn insert_with_ttl(&self, request: &SearchRequest, result: Retrieval, ttl: Duration) {
        self.cache.insert_with_ttl(request.cache_key(), result, ttl);
    }

    /// Number of cached retrievals.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Whether the cache holds no retrievals.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Drop all cached retrievals.
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
    use crate::types::Scope;

    #[test]
    fn test_roundtrip_and_expiry() {
        let clock = Arc::new(ManualClock::starting_now());
        let cache = ResultCache::new(clock.clone());
        let request = SearchRequest::new("q", Scope::owner("u1"));

        assert!(cache.get(&request).is_none());
        cache.insert(&request, Retrieval::empty());
        assert!(cache.get(&request).is_some());

        clock.advance(Duration::from_secs(3601));
        assert!(cache.get(&request).is_none());
    }

    #[test]
    fn test_equivalent_scopes_share_entries() {
        let clock = Arc::new(ManualClock::starting_now());
        let cache = ResultCache::new(clock);

        let a = SearchRequest::new(
            "q",
            Scope::owner("u1").with_articles(vec!["y".into(), "x".into()]),
        );
        let b = SearchRequest::new(
            "q",
            Scope::owner("u1").with_articles(vec!["x".into(), "y".into()]),
        );

        cache.insert(&a, Retrieval::empty());
        assert!(cache.get(&b).is_some());
    }
}
