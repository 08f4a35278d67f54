//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Cache sweep: removes expired cache entries
//! - Rate limit sweep: forgets identifiers whose window went stale

mod cleanup;

pub use cleanup::{spawn_cache_sweep, spawn_limiter_sweep, SweepHandle};
