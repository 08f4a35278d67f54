//! Rate Limit Policies
//!
//! Window/quota settings and the named policies endpoints pick from.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

// == Rate Limit Config ==
/// Fixed-window quota: at most `max_requests` per `window` per identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Window length
    pub window: Duration,
    /// Requests allowed per window
    pub max_requests: u32,
}

impl RateLimitConfig {
    /// Creates a config from a window and a quota.
    pub const fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            window,
            max_requests,
        }
    }
}

// == Policy ==
/// Named limiting policies, chosen by endpoint sensitivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    /// Public listings: 100 requests per 15 minutes
    Public,
    /// Authenticated writes and admin endpoints: 20 requests per 15 minutes
    Sensitive,
    /// Public form submissions: 5 requests per hour
    Forms,
}

impl Policy {
    /// Every policy, in a stable order.
    pub const ALL: [Policy; 3] = [Policy::Public, Policy::Sensitive, Policy::Forms];

    /// Name used in logs and responses.
    pub fn name(self) -> &'static str {
        match self {
            Policy::Public => "public",
            Policy::Sensitive => "sensitive",
            Policy::Forms => "forms",
        }
    }

    /// Reference quota for this policy.
    pub fn default_config(self) -> RateLimitConfig {
        match self {
            Policy::Public => RateLimitConfig::new(Duration::from_secs(15 * 60), 100),
            Policy::Sensitive => RateLimitConfig::new(Duration::from_secs(15 * 60), 20),
            Policy::Forms => RateLimitConfig::new(Duration::from_secs(60 * 60), 5),
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
