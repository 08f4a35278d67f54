//! Rate Limit Module
//!
//! Fixed-window request counting per client identifier, with independent
//! named policies.

mod config;
mod identifier;
mod limiter;
mod registry;


pub use config::{Policy, RateLimitConfig};
pub use identifier::{agent_hash, client_identifier};
pub use limiter::{FixedWindowLimiter, RateLimitDecision, RateLimitState};
pub use registry::RateLimiters;

// == Public Constants ==
/// Age after which an identifier's state is swept, in seconds
pub const DEFAULT_STALE_AFTER_SECS: u64 = 60 * 60;
