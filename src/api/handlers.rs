//! API Handlers
//!
//! HTTP request handlers for each endpoint.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use tracing::info;

use crate::cache::{cache_key, ttl_for_resource, SharedCache, TtlCache};
use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::models::{
    ClearResponse, CreatedResponse, FormReceipt, FormSubmission, HealthResponse, NewItem,
    PolicyStats, StatsResponse,
};
use crate::rate_limit::{Policy, RateLimiters};

/// Application state shared across all handlers.
///
/// Built once by the server and cloned into every request.
#[derive(Clone)]
pub struct AppState {
    /// Cached response bodies
    pub cache: SharedCache<Value>,
    /// Rate limiters for every policy
    pub limiters: Arc<RateLimiters>,
    /// Reference data behind the cache
    pub catalog: Arc<Catalog>,
    /// Whether forwarding headers identify the client
    pub trust_proxy: bool,
}

impl AppState {
    /// Creates a new AppState from its parts.
    pub fn new(cache: SharedCache<Value>, limiters: RateLimiters, catalog: Catalog) -> Self {
        Self {
            cache,
            limiters: Arc::new(limiters),
            catalog: Arc::new(catalog),
            trust_proxy: false,
        }
    }

    /// Sets whether `X-Forwarded-For` / `X-Real-IP` identify the client.
    pub fn with_trusted_proxy(mut self, trust_proxy: bool) -> Self {
        self.trust_proxy = trust_proxy;
        self
    }

    /// Creates a new AppState from configuration, with the sample catalog.
    pub fn from_config(config: &Config) -> Self {
        let cache = SharedCache::new(TtlCache::new(config.default_ttl()));
        Self::new(cache, RateLimiters::new(), Catalog::seeded())
            .with_trusted_proxy(config.trust_proxy)
    }
}

fn resource_endpoint(resource: &str) -> String {
    format!("/api/{}", resource)
}

/// Handler for GET /api/:resource
///
/// Serves a listing through the cache, keyed by path and sorted query.
pub async fn list_handler(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>> {
    let key = cache_key(&resource_endpoint(&resource), &params);
    let ttl = ttl_for_resource(&resource);
    let catalog = state.catalog.clone();

    let body = state
        .cache
        .get_or_insert_with(&key, Some(ttl), || async move {
            let list = catalog.list(&resource, &params).await?;
            Ok::<_, ApiError>(serde_json::to_value(list)?)
        })
        .await?;

    Ok(Json(body))
}

/// Handler for POST /api/:resource
///
/// Adds a row and drops every cached listing of that resource.
pub async fn create_handler(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    Json(req): Json<NewItem>,
) -> Result<(StatusCode, Json<CreatedResponse>)> {
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let item = state.catalog.insert(&resource, req.fields).await?;

    let endpoint = resource_endpoint(&resource);
    let mut removed = usize::from(state.cache.delete(&endpoint).await);
    removed += state.cache.invalidate_prefix(&format!("{}?", endpoint)).await;
    info!(resource = %resource, removed, "invalidated cached listings");

    Ok((StatusCode::CREATED, Json(CreatedResponse { resource, item })))
}

/// Handler for POST /api/forms/:form
///
/// Accepts a public form submission.
pub async fn form_handler(
    State(state): State<AppState>,
    Path(form): Path<String>,
    Json(req): Json<FormSubmission>,
) -> Result<(StatusCode, Json<FormReceipt>)> {
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let receipt = state.catalog.record_submission(&form, req.fields).await?;
    Ok((StatusCode::ACCEPTED, Json(receipt)))
}

/// Handler for DELETE /api/cache
pub async fn clear_cache_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    let removed = state.cache.stats().await.size;
    state.cache.clear().await;
    info!(removed, "cache cleared");

    Json(ClearResponse::new(removed))
}

/// Handler for GET /stats
///
/// Returns cache statistics and rate limiter occupancy.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.cache.stats().await;

    let mut rate_limits = Vec::with_capacity(Policy::ALL.len());
    for policy in Policy::ALL {
        let config = state.limiters.config(policy).await;
        rate_limits.push(PolicyStats {
            policy,
            window_secs: config.window.as_secs(),
            max_requests: config.max_requests,
            tracked: state.limiters.tracked(policy).await,
        });
    }

    Json(StatsResponse::new(cache, rate_limits))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use serde_json::json;
    use std::time::Duration;

    fn test_state() -> (AppState, ManualClock) {
        let clock = ManualClock::new();
        let cache = SharedCache::with_clock(Duration::from_secs(300), clock.shared());
        let state = AppState::new(
            cache,
            RateLimiters::with_clock(clock.shared()),
            Catalog::seeded(),
        );
        (state, clock)
    }

    fn no_params() -> Query<HashMap<String, String>> {
        Query(HashMap::new())
    }

    #[tokio::test]
    async fn test_list_handler_reads_through_cache() {
        let (state, _) = test_state();

        for _ in 0..3 {
            let body = list_handler(
                State(state.clone()),
                Path("categories".to_string()),
                no_params(),
            )
            .await
            .unwrap();
            assert_eq!(body["count"], 3);
        }

        assert_eq!(state.catalog.loads(), 1);
        assert_eq!(state.cache.stats().await.keys, vec!["/api/categories".to_string()]);
    }

    #[tokio::test]
    async fn test_list_handler_uses_resource_ttl() {
        let (state, clock) = test_state();

        let list = || list_handler(State(state.clone()), Path("rendezvous".to_string()), no_params());

        list().await.unwrap();
        clock.advance(Duration::from_secs(61));
        list().await.unwrap();

        assert_eq!(state.catalog.loads(), 2);
    }

    #[tokio::test]
    async fn test_list_handler_unknown_resource_not_cached() {
        let (state, _) = test_state();

        let result = list_handler(State(state.clone()), Path("inconnu".to_string()), no_params()).await;

        assert!(matches!(result, Err(ApiError::NotFound(_))));
        assert_eq!(state.cache.stats().await.size, 0);
    }

    #[tokio::test]
    async fn test_create_handler_invalidates_listings() {
        let (state, _) = test_state();
        let mut params = HashMap::new();
        params.insert("categorie".to_string(), "1".to_string());

        list_handler(State(state.clone()), Path("formations".to_string()), Query(params))
            .await
            .unwrap();
        list_handler(State(state.clone()), Path("formations".to_string()), no_params())
            .await
            .unwrap();
        list_handler(State(state.clone()), Path("categories".to_string()), no_params())
            .await
            .unwrap();

        let req: NewItem = serde_json::from_value(json!({"titre": "PowerPoint"})).unwrap();
        let (status, created) =
            create_handler(State(state.clone()), Path("formations".to_string()), Json(req))
                .await
                .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created.item["id"], 5);
        assert_eq!(state.cache.stats().await.keys, vec!["/api/categories".to_string()]);
    }

    #[tokio::test]
    async fn test_create_handler_invalid_request() {
        let (state, _) = test_state();
        let req: NewItem = serde_json::from_value(json!({})).unwrap();

        let result = create_handler(State(state), Path("formations".to_string()), Json(req)).await;
        assert!(matches!(result, Err(ApiError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_form_handler_accepts_submission() {
        let (state, _) = test_state();
        let req: FormSubmission =
            serde_json::from_value(json!({"email": "a@b.fr", "message": "Bonjour"})).unwrap();

        let (status, receipt) =
            form_handler(State(state.clone()), Path("contact".to_string()), Json(req))
                .await
                .unwrap();

        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(receipt.form, "contact");
        assert_eq!(state.catalog.submission_count(), 1);
    }

    #[tokio::test]
    async fn test_clear_cache_handler() {
        let (state, _) = test_state();
        state.cache.set("/api/categories", json!([]), None).await;

        let response = clear_cache_handler(State(state.clone())).await;

        assert_eq!(response.removed, 1);
        assert_eq!(state.cache.stats().await.size, 0);
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let (state, _) = test_state();
        state.limiters.check(Policy::Forms, "1.2.3.4:0").await;

        let response = stats_handler(State(state)).await;

        assert_eq!(response.cache.size, 0);
        assert_eq!(response.rate_limits.len(), 3);
        let forms = response
            .rate_limits
            .iter()
            .find(|p| p.policy == Policy::Forms)
            .unwrap();
        assert_eq!(forms.tracked, 1);
        assert_eq!(forms.max_requests, 5);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
