//! Fixed-Window Limiter
//!
//! Counts requests per identifier inside contiguous windows of fixed length.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::clock::{system_clock, SharedClock};
use crate::rate_limit::RateLimitConfig;

// == Rate Limit State ==
/// Per-identifier counter for the current window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitState {
    /// Requests seen since `window_start`
    pub request_count: u32,
    /// Start of the current window
    pub window_start: Instant,
}

// == Rate Limit Decision ==
/// Outcome of a single [`FixedWindowLimiter::check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    /// Whether the request may proceed
    pub allowed: bool,
    /// Requests left in the current window
    pub remaining: u32,
    /// End of the current window, set when the request is denied
    pub reset_at: Option<Instant>,
}

impl RateLimitDecision {
    fn allow(remaining: u32) -> Self {
        Self {
            allowed: true,
            remaining,
            reset_at: None,
        }
    }

    fn deny(reset_at: Instant) -> Self {
        Self {
            allowed: false,
            remaining: 0,
            reset_at: Some(reset_at),
        }
    }

    /// Time left until the window resets, measured from `now`.
    pub fn retry_after(&self, now: Instant) -> Option<Duration> {
        self.reset_at
            .map(|reset| reset.saturating_duration_since(now))
    }
}

// == Fixed Window Limiter ==
/// One policy's limiter: a config plus an identifier keyspace.
pub struct FixedWindowLimiter {
    config: RateLimitConfig,
    states: HashMap<String, RateLimitState>,
    clock: SharedClock,
}

impl FixedWindowLimiter {
    // == Constructor ==
    /// Creates a limiter on the system clock.
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_clock(config, system_clock())
    }

    /// Creates a limiter reading time from `clock`.
    pub fn with_clock(config: RateLimitConfig, clock: SharedClock) -> Self {
        Self {
            config,
            states: HashMap::new(),
            clock,
        }
    }

    // == Check ==
    /// Records a request from `identifier` and decides whether it may proceed.
    ///
    /// A missing state or an elapsed window starts a fresh window counting
    /// this request. Inside a window the count grows by one; once it passes
    /// the quota the request is denied until the window ends.
    pub fn check(&mut self, identifier: &str) -> RateLimitDecision {
        let now = self.clock.now();
        let max = self.config.max_requests;

        match self.states.get_mut(identifier) {
            Some(state)
                if now.saturating_duration_since(state.window_start) < self.config.window =>
            {
                state.request_count = state.request_count.saturating_add(1);
                if state.request_count > max {
                    RateLimitDecision::deny(state.window_start + self.config.window)
                } else {
                    RateLimitDecision::allow(max - state.request_count)
                }
            }
            _ => {
                self.states.insert(
                    identifier.to_string(),
                    RateLimitState {
                        request_count: 1,
                        window_start: now,
                    },
                );
                RateLimitDecision::allow(max.saturating_sub(1))
            }
        }
    }

    // == Cleanup Stale ==
    /// Drops every state whose window started more than `max_age` ago.
    ///
    /// A state whose window is still running is kept even when `max_age` is
    /// shorter than the window. Returns the number of identifiers removed.
    pub fn cleanup_stale(&mut self, max_age: Duration) -> usize {
        let now = self.clock.now();
        let window = self.config.window;
        let before = self.states.len();
        self.states.retain(|_, state| {
            let elapsed = now.saturating_duration_since(state.window_start);
            elapsed < window || elapsed <= max_age
        });
        before - self.states.len()
    }

    /// Current state for `identifier`, if any.
    pub fn state(&self, identifier: &str) -> Option<RateLimitState> {
        self.states.get(identifier).copied()
    }

    /// Number of identifiers currently tracked.
    pub fn tracked(&self) -> usize {
        self.states.len()
    }

    /// This limiter's quota.
    pub fn config(&self) -> RateLimitConfig {
        self.config
    }
}

impl std::fmt::Debug for FixedWindowLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixedWindowLimiter")
            .field("config", &self.config)
            .field("tracked", &self.states.len())
            .finish()
    }
}
