//! Cache Statistics Module
//!
//! Diagnostic snapshot of the cache: size, keys, hits and misses.

use serde::Serialize;

// == Cache Stats ==
/// Point-in-time view of the cache contents and counters.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct CacheStats {
    /// Number of entries physically present (expired ones included until swept)
    pub size: usize,
    /// Keys currently held, sorted
    pub keys: Vec<String>,
    /// Number of lookups that returned a value
    pub hits: u64,
    /// Number of lookups that found nothing or an expired entry
    pub misses: u64,
}

impl CacheStats {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
