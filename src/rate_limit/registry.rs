//! Policy Registry
//!
//! One independent limiter per named policy, each behind its own lock.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::warn;

use crate::clock::{system_clock, SharedClock};
use crate::rate_limit::{FixedWindowLimiter, Policy, RateLimitConfig, RateLimitDecision};

// == Rate Limiters ==
/// Limiters for every [`Policy`]. An identifier's count under one policy has
/// no effect on its count under another.
pub struct RateLimiters {
    limiters: HashMap<Policy, Mutex<FixedWindowLimiter>>,
    clock: SharedClock,
}

impl RateLimiters {
    /// Builds the registry with the reference quotas, on the system clock.
    pub fn new() -> Self {
        Self::with_clock(system_clock())
    }

    /// Builds the registry with the reference quotas, reading time from `clock`.
    pub fn with_clock(clock: SharedClock) -> Self {
        Self::with_configs(Policy::ALL.map(|p| (p, p.default_config())), clock)
    }

    /// Builds the registry with explicit quotas. Policies left out fall back
    /// to their reference quota.
    pub fn with_configs(
        configs: impl IntoIterator<Item = (Policy, RateLimitConfig)>,
        clock: SharedClock,
    ) -> Self {
        let mut chosen: HashMap<Policy, RateLimitConfig> =
            Policy::ALL.map(|p| (p, p.default_config())).into_iter().collect();
        chosen.extend(configs);

        let limiters = chosen
            .into_iter()
            .map(|(policy, config)| {
                (
                    policy,
                    Mutex::new(FixedWindowLimiter::with_clock(config, clock.clone())),
                )
            })
            .collect();

        Self { limiters, clock }
    }

    // == Check ==
    /// Records a request from `identifier` under `policy`.
    pub async fn check(&self, policy: Policy, identifier: &str) -> RateLimitDecision {
        let decision = self.limiter(policy).lock().await.check(identifier);
        if !decision.allowed {
            warn!(policy = policy.name(), identifier, "rate limit exceeded");
        }
        decision
    }

    // == Cleanup Stale ==
    /// Drops identifiers idle for longer than `max_age` in every policy.
    ///
    /// Returns the total number of identifiers removed.
    pub async fn cleanup_stale(&self, max_age: Duration) -> usize {
        let mut removed = 0;
        for policy in Policy::ALL {
            removed += self.limiter(policy).lock().await.cleanup_stale(max_age);
        }
        removed
    }

    /// Number of identifiers tracked under `policy`.
    pub async fn tracked(&self, policy: Policy) -> usize {
        self.limiter(policy).lock().await.tracked()
    }

    /// Quota configured for `policy`.
    pub async fn config(&self, policy: Policy) -> RateLimitConfig {
        self.limiter(policy).lock().await.config()
    }

    /// Current instant on the registry's clock.
    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    fn limiter(&self, policy: Policy) -> &Mutex<FixedWindowLimiter> {
        // Construction inserts every policy
        &self.limiters[&policy]
    }
}

impl Default for RateLimiters {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RateLimiters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiters")
            .field("policies", &self.limiters.keys().collect::<Vec<_>>())
            .finish()
    }
}
