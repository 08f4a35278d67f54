//! Shared Cache Module
//!
//! Thread-safe handle over a [`TtlCache`], plus the read-through helper used
//! by the request handlers.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::{CacheStats, TtlCache};
use crate::clock::SharedClock;

// == Shared Cache ==
/// Cloneable handle to a cache guarded by an async `RwLock`.
pub struct SharedCache<T> {
    inner: Arc<RwLock<TtlCache<T>>>,
}

impl<T> Clone for SharedCache<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone> SharedCache<T> {
    /// Wraps an existing cache.
    pub fn new(cache: TtlCache<T>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(cache)),
        }
    }

    /// Creates an empty shared cache reading time from `clock`.
    pub fn with_clock(default_ttl: Duration, clock: SharedClock) -> Self {
        Self::new(TtlCache::with_clock(default_ttl, clock))
    }

    /// See [`TtlCache::get`]. Takes the write lock since expired entries are
    /// removed on lookup.
    pub async fn get(&self, key: &str) -> Option<T> {
        self.inner.write().await.get(key)
    }

    /// See [`TtlCache::set`].
    pub async fn set(&self, key: impl Into<String>, value: T, ttl: Option<Duration>) {
        self.inner.write().await.set(key, value, ttl);
    }

    /// See [`TtlCache::delete`].
    pub async fn delete(&self, key: &str) -> bool {
        self.inner.write().await.delete(key)
    }

    /// See [`TtlCache::clear`].
    pub async fn clear(&self) {
        self.inner.write().await.clear();
    }

    /// See [`TtlCache::invalidate_prefix`].
    pub async fn invalidate_prefix(&self, prefix: &str) -> usize {
        self.inner.write().await.invalidate_prefix(prefix)
    }

    /// See [`TtlCache::stats`].
    pub async fn stats(&self) -> CacheStats {
        self.inner.read().await.stats()
    }

    /// See [`TtlCache::cleanup_expired`].
    pub async fn cleanup_expired(&self) -> usize {
        self.inner.write().await.cleanup_expired()
    }

    /// Number of live handles sharing this cache.
    #[cfg(test)]
    pub(crate) fn handle_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    // == Read Through ==
    /// Returns the cached value for `key`, or computes and stores it.
    ///
    /// On a miss `producer` is awaited once, without holding the lock, and an
    /// `Ok` result is cached under `key` for `ttl`. An `Err` is handed back
    /// untouched and nothing is stored. Concurrent misses on the same key may
    /// each run their own producer.
    pub async fn get_or_insert_with<F, Fut, E>(
        &self,
        key: &str,
        ttl: Option<Duration>,
        producer: F,
    ) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.get(key).await {
            debug!(key, "cache hit");
            return Ok(value);
        }

        debug!(key, "cache miss");
        let value = producer().await?;
        self.set(key, value.clone(), ttl).await;
        Ok(value)
    }
}
