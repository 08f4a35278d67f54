//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A stored value together with its creation instant and lifetime.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// The stored value
    pub data: T,
    /// Instant the entry was written
    pub created_at: Instant,
    /// Lifetime of the entry
    pub ttl: Duration,
}

impl<T> CacheEntry<T> {
    // == Constructor ==
    /// Creates an entry written at `now`.
    pub fn new(data: T, now: Instant, ttl: Duration) -> Self {
        Self {
            data,
            created_at: now,
            ttl,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// An entry stays valid while `now - created_at <= ttl`; it expires on the
    /// first instant strictly past its lifetime.
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) > self.ttl
    }
}
