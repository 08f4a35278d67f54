//! Request Shield - request-level cache and rate limiting
//!
//! In-process TTL cache and fixed-window rate limiter guarding the REST API
//! of a training-center back office, with the HTTP layer that consumes them.

pub mod api;
pub mod cache;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod rate_limit;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use tasks::{spawn_cache_sweep, spawn_limiter_sweep, SweepHandle};
