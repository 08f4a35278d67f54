//! Cache Store Module
//!
//! Main cache engine: HashMap storage with per-entry TTL expiration.

use std::collections::HashMap;
use std::time::Duration;

use crate::cache::{CacheEntry, CacheStats};
use crate::clock::{system_clock, SharedClock};

// == TTL Cache ==
/// Key/value store where every entry carries its own lifetime.
///
/// Expired entries are never returned. They are dropped lazily by [`get`]
/// and in bulk by [`cleanup_expired`], which the background sweep calls.
///
/// [`get`]: TtlCache::get
/// [`cleanup_expired`]: TtlCache::cleanup_expired
pub struct TtlCache<T> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<T>>,
    /// TTL applied when `set` is called without one
    default_ttl: Duration,
    /// Time source
    clock: SharedClock,
    /// Successful lookups
    hits: u64,
    /// Lookups that found nothing usable
    misses: u64,
}

impl<T: Clone> TtlCache<T> {
    // == Constructor ==
    /// Creates an empty cache on the system clock.
    pub fn new(default_ttl: Duration) -> Self {
        Self::with_clock(default_ttl, system_clock())
    }

    /// Creates an empty cache reading time from `clock`.
    pub fn with_clock(default_ttl: Duration, clock: SharedClock) -> Self {
        Self {
            entries: HashMap::new(),
            default_ttl,
            clock,
            hits: 0,
            misses: 0,
        }
    }

    // == Get ==
    /// Returns a clone of the value stored under `key`, if still valid.
    ///
    /// An expired entry is removed on the spot and reported as absent.
    /// Reading never extends an entry's lifetime.
    pub fn get(&mut self, key: &str) -> Option<T> {
        let now = self.clock.now();

        match self.entries.get(key) {
            Some(entry) if entry.is_expired(now) => {
                self.entries.remove(key);
                self.misses += 1;
                None
            }
            Some(entry) => {
                self.hits += 1;
                Some(entry.data.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    // == Set ==
    /// Stores `value` under `key`, replacing any previous entry.
    ///
    /// `ttl` of `None` applies the cache's default TTL.
    pub fn set(&mut self, key: impl Into<String>, value: T, ttl: Option<Duration>) {
        let ttl = ttl.unwrap_or(self.default_ttl);
        let entry = CacheEntry::new(value, self.clock.now(), ttl);
        self.entries.insert(key.into(), entry);
    }

    // == Delete ==
    /// Removes the entry under `key`. Returns whether one was present.
    pub fn delete(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    // == Clear ==
    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    // == Invalidate Prefix ==
    /// Removes every entry whose key starts with `prefix`.
    ///
    /// Returns the number of entries removed.
    pub fn invalidate_prefix(&mut self, prefix: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.starts_with(prefix));
        before - self.entries.len()
    }

    // == Stats ==
    /// Returns the current entry count, sorted keys and lookup counters.
    pub fn stats(&self) -> CacheStats {
        let mut keys: Vec<String> = self.entries.keys().cloned().collect();
        keys.sort();

        CacheStats {
            size: self.entries.len(),
            keys,
            hits: self.hits,
            misses: self.misses,
        }
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        before - self.entries.len()
    }

    // == Default TTL ==
    /// TTL applied when none is given to [`set`](TtlCache::set).
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    // == Length ==
    /// Returns the number of entries physically present.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> std::fmt::Debug for TtlCache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache")
            .field("entries", &self.entries.len())
            .field("default_ttl", &self.default_ttl)
            .field("hits", &self.hits)
            .field("misses", &self.misses)
            .finish()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn test_cache() -> (TtlCache<String>, ManualClock) {
        let clock = ManualClock::new();
        let cache = TtlCache::with_clock(Duration::from_secs(300), clock.shared());
        (cache, clock)
    }

    #[test]
    fn test_cache_new() {
        let (cache, _) = test_cache();
        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
        assert_eq!(cache.default_ttl(), Duration::from_secs(300));
    }

    #[test]
    fn test_cache_set_and_get() {
        let (mut cache, _) = test_cache();

        cache.set("key1", "value1".to_string(), None);

        assert_eq!(cache.get("key1"), Some("value1".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_get_nonexistent() {
        let (mut cache, _) = test_cache();
        assert_eq!(cache.get("nonexistent"), None);
    }

    #[test]
    fn test_cache_delete() {
        let (mut cache, _) = test_cache();

        cache.set("key1", "value1".to_string(), None);

        assert!(cache.delete("key1"));
        assert!(cache.is_empty());
        assert_eq!(cache.get("key1"), None);
    }

    #[test]
    fn test_cache_delete_nonexistent_is_noop() {
        let (mut cache, _) = test_cache();
        cache.set("key1", "value1".to_string(), None);

        assert!(!cache.delete("nonexistent"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_overwrite() {
        let (mut cache, _) = test_cache();

        cache.set("key1", "value1".to_string(), None);
        cache.set("key1", "value2".to_string(), None);

        assert_eq!(cache.get("key1"), Some("value2".to_string()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_overwrite_resets_timestamp() {
        let (mut cache, clock) = test_cache();

        cache.set("key1", "value1".to_string(), Some(Duration::from_secs(10)));
        clock.advance(Duration::from_secs(8));
        cache.set("key1", "value2".to_string(), Some(Duration::from_secs(10)));
        clock.advance(Duration::from_secs(8));

        assert_eq!(cache.get("key1"), Some("value2".to_string()));
    }

    #[test]
    fn test_cache_ttl_expiration() {
        let (mut cache, clock) = test_cache();

        cache.set("key1", "value1".to_string(), Some(Duration::from_secs(1)));
        assert!(cache.get("key1").is_some());

        clock.advance(Duration::from_millis(1001));

        assert_eq!(cache.get("key1"), None);
        // Expired entry is dropped eagerly by the lookup
        assert!(!cache.stats().keys.contains(&"key1".to_string()));
    }

    #[test]
    fn test_cache_get_does_not_slide_expiration() {
        let (mut cache, clock) = test_cache();

        cache.set("key1", "value1".to_string(), Some(Duration::from_secs(10)));
        for _ in 0..4 {
            clock.advance(Duration::from_secs(3));
            let _ = cache.get("key1");
        }

        assert_eq!(cache.get("key1"), None);
    }

    #[test]
    fn test_cache_default_ttl_applies() {
        let (mut cache, clock) = test_cache();

        cache.set("key1", "value1".to_string(), None);
        clock.advance(Duration::from_secs(300));
        assert!(cache.get("key1").is_some());

        clock.advance(Duration::from_secs(1));
        assert!(cache.get("key1").is_none());
    }

    #[test]
    fn test_cache_clear() {
        let (mut cache, _) = test_cache();

        cache.set("a", "1".to_string(), None);
        cache.set("b", "2".to_string(), None);
        cache.clear();

        assert!(cache.is_empty());
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), None);
    }

    #[test]
    fn test_cache_invalidate_prefix() {
        let (mut cache, _) = test_cache();

        cache.set("/api/formations", "all".to_string(), None);
        cache.set("/api/formations?niveau=1", "n1".to_string(), None);
        cache.set("/api/categories", "cats".to_string(), None);

        let removed = cache.invalidate_prefix("/api/formations");

        assert_eq!(removed, 2);
        assert_eq!(cache.stats().keys, vec!["/api/categories".to_string()]);
    }

    #[test]
    fn test_cache_stats() {
        let (mut cache, _) = test_cache();

        cache.set("b", "2".to_string(), None);
        cache.set("a", "1".to_string(), None);
        cache.get("a"); // hit
        cache.get("nonexistent"); // miss

        let stats = cache.stats();
        assert_eq!(stats.size, 2);
        assert_eq!(stats.keys, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_cache_cleanup_expired() {
        let (mut cache, clock) = test_cache();

        cache.set("key1", "value1".to_string(), Some(Duration::from_secs(1)));
        cache.set("key2", "value2".to_string(), Some(Duration::from_secs(10)));

        clock.advance(Duration::from_secs(2));

        let removed = cache.cleanup_expired();
        assert_eq!(removed, 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("key2").is_some());
    }
}
