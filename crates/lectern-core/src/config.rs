//! Configuration for the retrieval subsystem.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tuning parameters for the retrieval service and caches.
///
/// All values have serde defaults, so a partial config file deserializes
/// cleanly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Result cache entry lifetime in seconds.
    pub result_ttl_secs: u64,
    /// Embedding cache entry lifetime in seconds.
    pub embedding_ttl_secs: u64,
    /// Capacity bound applied to each cache.
    pub cache_capacity: usize,
    /// Candidate sample size for the substring tier (most recent
    /// documents in scope).
    pub substring_sample_limit: usize,
    /// Maximum excerpt length in characters.
    pub excerpt_max_len: usize,
    /// Per-tier deadline in seconds; a tier exceeding it is treated as
    /// having failed, which triggers fallback.
    pub tier_timeout_secs: u64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            result_ttl_secs: 3600,
            embedding_ttl_secs: 3600,
            cache_capacity: 1000,
            substring_sample_limit: 50,
            excerpt_max_len: 300,
            tier_timeout_secs: 10,
        }
    }
}

impl RetrievalConfig {
    /// Set both cache TTLs at once.
    pub fn with_ttl_secs(mut self, ttl_secs: u64) -> Self {
        self.result_ttl_secs = ttl_secs;
        self.embedding_ttl_secs = ttl_secs;
        self
    }

    /// Set the cache capacity.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Set the per-tier deadline.
    pub fn with_tier_timeout(mut self, timeout: Duration) -> Self {
        self.tier_timeout_secs = timeout.as_secs();
        self
    }

    /// Result cache TTL as a [`Duration`].
    pub fn result_ttl(&self) -> Duration {
        Duration::from_secs(self.result_ttl_secs)
    }

    /// Embedding cache TTL as a [`Duration`].
    pub fn embedding_ttl(&self) -> Duration {
        Duration::from_secs(self.embedding_ttl_secs)
    }

    /// Per-tier deadline as a [`Duration`].
    pub fn tier_timeout(&self) -> Duration {
        Duration::from_secs(self.tier_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RetrievalConfig::default();
        assert_eq!(config.result_ttl_secs, 3600);
        assert_eq!(config.cache_capacity, 1000);
        assert_eq!(config.substring_sample_limit, 50);
    }

    #[test]
    fn test_partial_deserialization() {
        let config: RetrievalConfig =
            serde_json::from_str(r#"{"cache_capacity": 10}"#).unwrap();
        assert_eq!(config.cache_capacity, 10);
        assert_eq!(config.result_ttl_secs, 3600);
    }

    #[test]
    fn test_builders() {
        let config = RetrievalConfig::default()
            .with_ttl_secs(60)
            .with_tier_timeout(Duration::from_secs(2));
        assert_eq!(config.embedding_ttl(), Duration::from_secs(60));
        assert_eq!(config.tier_timeout(), Duration::from_secs(2));
    }
}
