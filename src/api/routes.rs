//! API Routes
//!
//! Configures the Axum router and attaches a rate-limit policy to every
//! endpoint according to its sensitivity.

use axum::{
    handler::Handler,
    middleware::from_fn_with_state,
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_cache_handler, create_handler, form_handler, health_handler, list_handler,
    stats_handler, AppState,
};
use super::middleware::{rate_limit, PolicyGuard};
use crate::rate_limit::Policy;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /health` - Health check, never limited
/// - `GET /stats` - Cache and limiter statistics (sensitive)
/// - `GET /api/:resource` - Cached listing (public)
/// - `POST /api/:resource` - Create a row (sensitive)
/// - `POST /api/forms/:form` - Public form submission (forms)
/// - `DELETE /api/cache` - Clear the cache (sensitive)
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let guard = |policy| PolicyGuard::new(state.limiters.clone(), policy, state.trust_proxy);

    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/stats",
            get(stats_handler.layer(from_fn_with_state(guard(Policy::Sensitive), rate_limit))),
        )
        .route(
            "/api/:resource",
            get(list_handler.layer(from_fn_with_state(guard(Policy::Public), rate_limit)))
                .post(create_handler.layer(from_fn_with_state(guard(Policy::Sensitive), rate_limit))),
        )
        .route(
            "/api/forms/:form",
            post(form_handler.layer(from_fn_with_state(guard(Policy::Forms), rate_limit))),
        )
        .route(
            "/api/cache",
            delete(clear_cache_handler.layer(from_fn_with_state(guard(Policy::Sensitive), rate_limit))),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::SharedCache;
    use crate::catalog::Catalog;
    use crate::clock::ManualClock;
    use crate::rate_limit::RateLimiters;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::time::Duration;
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        let clock = ManualClock::new();
        let state = AppState::new(
            SharedCache::with_clock(Duration::from_secs(300), clock.shared()),
            RateLimiters::with_clock(clock.shared()),
            Catalog::seeded(),
        );
        create_router(state)
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(!response.headers().contains_key("x-ratelimit-limit"));
    }

    #[tokio::test]
    async fn test_list_endpoint_carries_quota_headers() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/categories")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-ratelimit-limit"], "100");
        assert_eq!(response.headers()["x-ratelimit-remaining"], "99");
    }

    #[tokio::test]
    async fn test_create_endpoint_uses_sensitive_policy() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/categories")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"nom":"Sécurité"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()["x-ratelimit-limit"], "20");
    }

    #[tokio::test]
    async fn test_unknown_resource_not_found() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/inconnu")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
