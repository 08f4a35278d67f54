//! Error types for the API layer
//!
//! The cache and the rate limiter never fail; errors here come from request
//! validation, unknown resources and rate-limit denials.

use std::time::Duration;

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use thiserror::Error;

use crate::models::{ErrorResponse, RateLimitedResponse};
use crate::rate_limit::Policy;

// == API Error Enum ==
/// Unified error type for request handling.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Unknown resource or form
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The client used up its quota for the current window
    #[error("Too many requests for policy {policy}")]
    RateLimited {
        policy: Policy,
        limit: u32,
        retry_after: Duration,
    },

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::RateLimited {
                policy,
                limit,
                retry_after,
            } => return rate_limited_response(policy, limit, retry_after),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

/// 429 with the reset time in the body and the quota echoed in headers.
fn rate_limited_response(policy: Policy, limit: u32, retry_after: Duration) -> Response {
    let reset_time = Utc::now()
        + chrono::Duration::from_std(retry_after).unwrap_or_else(|_| chrono::Duration::zero());
    // Round up so clients never retry before the window ends
    let retry_secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);

    let body = RateLimitedResponse::new(policy, reset_time.to_rfc3339(), retry_secs);
    let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();

    let headers = response.headers_mut();
    headers.insert("x-ratelimit-limit", HeaderValue::from(limit));
    headers.insert("x-ratelimit-remaining", HeaderValue::from(0u32));
    headers.insert("x-ratelimit-reset", HeaderValue::from(reset_time.timestamp()));
    headers.insert("retry-after", HeaderValue::from(retry_secs));
    response
}

// == Result Type Alias ==
/// Convenience Result type for the API layer.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_status() {
        let response = ApiError::NotFound("x".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_invalid_request_status() {
        let response = ApiError::InvalidRequest("x".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_rate_limited_headers() {
        let response = ApiError::RateLimited {
            policy: Policy::Forms,
            limit: 5,
            retry_after: Duration::from_millis(59_990),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        let headers = response.headers();
        assert_eq!(headers["x-ratelimit-limit"], "5");
        assert_eq!(headers["x-ratelimit-remaining"], "0");
        assert_eq!(headers["retry-after"], "60");
        assert!(headers.contains_key("x-ratelimit-reset"));
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::RateLimited {
            policy: Policy::Sensitive,
            limit: 20,
            retry_after: Duration::from_secs(1),
        };
        assert_eq!(err.to_string(), "Too many requests for policy sensitive");
    }
}
