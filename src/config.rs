//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::cache::DEFAULT_TTL_SECS;
use crate::rate_limit::DEFAULT_STALE_AFTER_SECS;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
/// Rate-limit quotas are fixed per policy.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Default cache TTL in seconds for entries without explicit TTL
    pub default_ttl: u64,
    /// Interval between background sweeps in seconds
    pub sweep_interval: u64,
    /// Age in seconds after which rate-limit state is swept
    pub stale_after: u64,
    /// Take the client address from `X-Forwarded-For` / `X-Real-IP`.
    /// Only safe behind a reverse proxy that overwrites those headers.
    pub trust_proxy: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CACHE_DEFAULT_TTL` - Default TTL in seconds (default: 300)
    /// - `SWEEP_INTERVAL` - Sweep frequency in seconds (default: 300)
    /// - `RATE_LIMIT_STALE_AFTER` - Rate-limit state lifetime in seconds (default: 3600)
    /// - `TRUST_PROXY_HEADERS` - Trust forwarding headers, `true`/`false` (default: false)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env_or("SERVER_PORT", defaults.server_port),
            default_ttl: env_or("CACHE_DEFAULT_TTL", defaults.default_ttl),
            sweep_interval: env_or("SWEEP_INTERVAL", defaults.sweep_interval),
            stale_after: env_or("RATE_LIMIT_STALE_AFTER", defaults.stale_after),
            trust_proxy: env_or("TRUST_PROXY_HEADERS", defaults.trust_proxy),
        }
    }

    /// Default cache TTL.
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl)
    }

    /// Interval between sweeps, never below one second.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval.max(1))
    }

    /// Rate-limit state lifetime.
    pub fn stale_after(&self) -> Duration {
        Duration::from_secs(self.stale_after)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            default_ttl: DEFAULT_TTL_SECS,
            sweep_interval: 300,
            stale_after: DEFAULT_STALE_AFTER_SECS,
            trust_proxy: false,
        }
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
