//! API Module
//!
//! HTTP handlers, rate-limit middleware and routing.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint
//! - `GET /stats` - Cache and rate limiter statistics
//! - `GET /api/:resource` - Cached resource listing
//! - `POST /api/:resource` - Create a row and invalidate its listings
//! - `POST /api/forms/:form` - Public form submission
//! - `DELETE /api/cache` - Clear the cache

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use handlers::*;
pub use middleware::{rate_limit, request_identifier, PolicyGuard};
pub use routes::create_router;
