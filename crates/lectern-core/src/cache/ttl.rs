//! Generic TTL cache with capacity-bounded, insertion-order eviction.
//!
//! One policy backs both the embedding cache and the result cache:
//! entries are immutable once stored (a refresh inserts a new entry),
//! expired entries read as absent, and every insert first purges expired
//! entries and then evicts oldest-by-insertion entries until under
//! capacity. This is insertion-order eviction, not access-order LRU.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};

use super::clock::Clock;

/// Default entry lifetime: one hour.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Default capacity bound shared by both caches.
pub const MAX_CACHE_SIZE: usize = 1000;

/// Cache hit/miss/eviction counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

struct Entry<V> {
    value: V,
    inserted_at: DateTime<Utc>,
    ttl: Duration,
    /// Monotonic insertion sequence; the eviction order key.
    seq: u64,
}

impl<V> Entry<V> {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        let age = now.signed_duration_since(self.inserted_at);
        match chrono::Duration::from_std(self.ttl) {
            Ok(ttl) => age >= ttl,
            Err(_) => false,
        }
    }
}

/// Shared in-process TTL cache.
///
/// Interior mutability via `RwLock`; clone-out semantics on `get` so
/// callers never hold the lock. Safe to share across concurrent async
/// callers behind an `Arc`, single-process only.
pub struct TtlCache<K, V> {
    inner: RwLock<Inner<K, V>>,
    clock: Arc<dyn Clock>,
    default_ttl: Duration,
    capacity: usize,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

struct Inner<K, V> {
    map: HashMap<K, Entry<V>>,
    next_seq: u64,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create a cache with the default TTL and capacity.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_limits(clock, DEFAULT_TTL, MAX_CACHE_SIZE)
    }

    /// Create a cache with explicit TTL and capacity.
    pub fn with_limits(clock: Arc<dyn Clock>, default_ttl: Duration, capacity: usize) -> Self {
        Self {
            inner: RwLock::new(Inner {
                map: HashMap::new(),
                next_seq: 0,
            }),
            clock,
            default_ttl,
            capacity,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Look up a value. Expired entries read as absent, not stale.
    pub fn get(&self, key: &K) -> Option<V> {
        let now = self.clock.now();
        let inner = self.inner.read().unwrap();
        match inner.map.get(key) {
            Some(entry) if !entry.is_expired(now) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.value.clone())
            }
            _ => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Insert with the default TTL.
    pub fn insert(&self, key: K, value: V) {
        self.insert_with_ttl(key, value, self.default_ttl);
    }

    /// Insert with an explicit TTL.
    ///
    /// Eviction runs on every insert: expired entries are purged first;
    /// if the map is still at or above capacity, the single oldest entry
    /// by insertion sequence is evicted repeatedly until under capacity.
    pub fn insert_with_ttl(&self, key: K, value: V, ttl: Duration) {
        let now = self.clock.now();
        let mut inner = self.inner.write().unwrap();

        inner.map.retain(|_, entry| !entry.is_expired(now));

        while inner.map.len() >= self.capacity {
            let oldest = inner
                .map
                .iter()
                .min_by_key(|(_, entry)| entry.seq)
                .map(|(k, _)| k.clone());
            match oldest {
                Some(k) => {
                    inner.map.remove(&k);
                    self.evictions.fetch_add(1, Ordering::Relaxed);
                }
                None => break,
            }
        }

        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.map.insert(
            key,
            Entry {
                value,
                inserted_at: now,
                ttl,
                seq,
            },
        );
    }

    /// Number of entries, including any not yet purged expired ones.
    pub fn len(&self) -> usize {
        self.inner.read().unwrap().map.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all entries. Counters are preserved.
    pub fn clear(&self) {
        self.inner.write().unwrap().map.clear();
    }

    /// Snapshot of the hit/miss/eviction counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::clock::ManualClock;

    fn cache_with_clock(capacity: usize) -> (TtlCache<String, i32>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::starting_now());
        let cache = TtlCache::with_limits(clock.clone(), Duration::from_secs(60), capacity);
        (cache, clock)
    }

    #[test]
    fn test_hit_within_ttl() {
        let (cache, clock) = cache_with_clock(10);
        cache.insert("a".into(), 1);
        clock.advance(Duration::from_secs(59));
        assert_eq!(cache.get(&"a".into()), Some(1));
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    fn test_expired_reads_as_absent() {
        let (cache, clock) = cache_with_clock(10);
        cache.insert("a".into(), 1);
        clock.advance(Duration::from_secs(60));
        assert_eq!(cache.get(&"a".into()), None);
        assert_eq!(cache.stats().misses, 1);
    }

    #[test]
    fn test_insert_purges_expired_before_evicting() {
        let (cache, clock) = cache_with_clock(2);
        cache.insert("a".into(), 1);
        cache.insert("b".into(), 2);
        clock.advance(Duration::from_secs(61));
        // Both expired; the insert purge should make room without evictions.
        cache.insert("c".into(), 3);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.stats().evictions, 0);
    }

    #[test]
    fn test_capacity_evicts_oldest_by_insertion() {
        let (cache, _clock) = cache_with_clock(2);
        cache.insert("a".into(), 1);
        cache.insert("b".into(), 2);
        cache.insert("c".into(), 3);
        assert_eq!(cache.get(&"a".into()), None);
        assert_eq!(cache.get(&"b".into()), Some(2));
        assert_eq!(cache.get(&"c".into()), Some(3));
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn test_refresh_is_a_new_entry() {
        let (cache, clock) = cache_with_clock(10);
        cache.insert("a".into(), 1);
        clock.advance(Duration::from_secs(40));
        cache.insert("a".into(), 2);
        clock.advance(Duration::from_secs(40));
        // 80s after the first insert, 40s after the refresh.
        assert_eq!(cache.get(&"a".into()), Some(2));
    }

    #[test]
    fn test_clear() {
        let (cache, _clock) = cache_with_clock(10);
        cache.insert("a".into(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }
}
