//! Request and Response models for the API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{FormSubmission, NewItem};
pub use responses::{
    ClearResponse, CreatedResponse, ErrorResponse, FormReceipt, HealthResponse, ListResponse,
    PolicyStats, RateLimitedResponse, StatsResponse,
};
