//! Rate Limit Middleware
//!
//! Checks the caller against a policy before the handler runs. Denials turn
//! into HTTP 429; allowed responses carry the remaining quota.
//!
//! Forwarding headers are client-controlled. They are read only when the
//! guard trusts them, which is correct only behind a reverse proxy that
//! replaces them; otherwise the peer address identifies the caller.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};

use crate::error::{ApiError, Result};
use crate::rate_limit::{client_identifier, Policy, RateLimiters};

/// State handed to the middleware: which policy to enforce, and where.
#[derive(Clone)]
pub struct PolicyGuard {
    limiters: Arc<RateLimiters>,
    policy: Policy,
    trust_proxy: bool,
}

impl PolicyGuard {
    /// Guard enforcing `policy` with the given limiters.
    pub fn new(limiters: Arc<RateLimiters>, policy: Policy, trust_proxy: bool) -> Self {
        Self {
            limiters,
            policy,
            trust_proxy,
        }
    }
}

/// Middleware function: use with `from_fn_with_state(PolicyGuard::new(..), rate_limit)`.
pub async fn rate_limit(
    State(guard): State<PolicyGuard>,
    request: Request,
    next: Next,
) -> Result<Response> {
    let identifier = request_identifier(&request, guard.trust_proxy);
    let decision = guard.limiters.check(guard.policy, &identifier).await;
    let limit = guard.limiters.config(guard.policy).await.max_requests;

    if !decision.allowed {
        let retry_after = decision
            .retry_after(guard.limiters.now())
            .unwrap_or_default();
        return Err(ApiError::RateLimited {
            policy: guard.policy,
            limit,
            retry_after,
        });
    }

    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert("x-ratelimit-limit", HeaderValue::from(limit));
    headers.insert("x-ratelimit-remaining", HeaderValue::from(decision.remaining));
    Ok(response)
}

/// Derives the limiter key for a request from its client address and
/// user agent.
///
/// With `trust_proxy` the forwarding headers win over the peer address.
pub fn request_identifier(request: &Request, trust_proxy: bool) -> String {
    let headers = request.headers();
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string());

    let forwarded = if trust_proxy {
        client_address(headers)
    } else {
        None
    };
    let address = forwarded.or(peer);
    let agent = headers
        .get(axum::http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok());

    client_identifier(address.as_deref().unwrap_or("unknown"), agent)
}

/// First hop of `X-Forwarded-For`, else `X-Real-IP`.
fn client_address(headers: &HeaderMap) -> Option<String> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    let real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    forwarded.or_else(real_ip).map(str::to_string)
}
