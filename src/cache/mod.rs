//! Cache Module
//!
//! Process-local key/value cache with per-entry TTL expiration, used as a
//! read-through cache in front of read-mostly reference data.

mod entry;
mod key;
mod shared;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use key::{cache_key, ttl_for_resource, DEFAULT_RESOURCE_TTL};
pub use shared::SharedCache;
pub use stats::CacheStats;
pub use store::TtlCache;

// == Public Constants ==
/// TTL applied by `set` when the caller gives none, in seconds
pub const DEFAULT_TTL_SECS: u64 = 300;
