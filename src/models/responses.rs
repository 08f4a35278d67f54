//! Response DTOs for the API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::cache::CacheStats;
use crate::rate_limit::Policy;

/// Response body for GET /api/:resource
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse {
    /// Resource name
    pub resource: String,
    /// Number of items returned
    pub count: usize,
    /// Matching rows
    pub items: Vec<Value>,
}

impl ListResponse {
    /// Creates a new ListResponse
    pub fn new(resource: impl Into<String>, items: Vec<Value>) -> Self {
        Self {
            resource: resource.into(),
            count: items.len(),
            items,
        }
    }
}

/// Response body for POST /api/:resource
#[derive(Debug, Clone, Serialize)]
pub struct CreatedResponse {
    /// Resource the item was added to
    pub resource: String,
    /// The stored item, id included
    pub item: Value,
}

/// Receipt for POST /api/forms/:form
#[derive(Debug, Clone, Serialize)]
pub struct FormReceipt {
    /// Submission number
    pub id: u64,
    /// Form name
    pub form: String,
    /// Number of fields received
    pub fields: usize,
    /// Reception time in RFC 3339 format
    pub received_at: String,
}

/// Response body for DELETE /api/cache
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    /// Success message
    pub message: String,
    /// Number of entries dropped
    pub removed: usize,
}

impl ClearResponse {
    /// Creates a new ClearResponse
    pub fn new(removed: usize) -> Self {
        Self {
            message: format!("Cache cleared, {} entries removed", removed),
            removed,
        }
    }
}

/// Per-policy section of the stats endpoint
#[derive(Debug, Clone, Serialize)]
pub struct PolicyStats {
    /// Policy name
    pub policy: Policy,
    /// Window length in seconds
    pub window_secs: u64,
    /// Requests allowed per window
    pub max_requests: u32,
    /// Identifiers currently tracked
    pub tracked: usize,
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Cache contents and counters
    pub cache: CacheStats,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    /// Rate limiter state per policy
    pub rate_limits: Vec<PolicyStats>,
}

impl StatsResponse {
    /// Creates a new StatsResponse from cache statistics
    pub fn new(cache: CacheStats, rate_limits: Vec<PolicyStats>) -> Self {
        Self {
            hit_rate: cache.hit_rate(),
            cache,
            rate_limits,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions except rate limiting
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Error response body for HTTP 429
#[derive(Debug, Clone, Serialize)]
pub struct RateLimitedResponse {
    /// Error kind, always "rate_limited"
    pub error: String,
    /// Human readable explanation
    pub message: String,
    /// Policy that denied the request
    pub policy: Policy,
    /// When the window resets, RFC 3339
    pub reset_time: String,
    /// Seconds to wait before retrying
    pub retry_after: u64,
}

impl RateLimitedResponse {
    /// Creates a new RateLimitedResponse
    pub fn new(policy: Policy, reset_time: String, retry_after: u64) -> Self {
        Self {
            error: "rate_limited".to_string(),
            message: "Too many requests, please try again later".to_string(),
            policy,
            reset_time,
            retry_after,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_response_counts_items() {
        let resp = ListResponse::new("categories", vec![json!({"id": 1}), json!({"id": 2})]);
        assert_eq!(resp.count, 2);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["resource"], "categories");
    }

    #[test]
    fn test_stats_response_hit_rate() {
        let cache = CacheStats {
            hits: 80,
            misses: 20,
            ..Default::default()
        };
        let resp = StatsResponse::new(cache, Vec::new());
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("Something went wrong");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("error"));
        assert!(json.contains("Something went wrong"));
    }

    #[test]
    fn test_rate_limited_response_serialize() {
        let resp = RateLimitedResponse::new(
            Policy::Public,
            "2024-09-12T10:00:00+00:00".to_string(),
            30,
        );
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["error"], "rate_limited");
        assert_eq!(json["policy"], "public");
        assert_eq!(json["retry_after"], 30);
    }

    #[test]
    fn test_clear_response_message() {
        let resp = ClearResponse::new(3);
        assert!(resp.message.contains('3'));
    }
}
