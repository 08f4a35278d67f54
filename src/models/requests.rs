//! Request DTOs for the API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Maximum number of fields accepted in one body
pub const MAX_FIELDS: usize = 50;

/// Request body for POST /api/:resource
///
/// Any JSON object; the server assigns the `id`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewItem {
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl NewItem {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.fields.is_empty() {
            return Some("Item cannot be empty".to_string());
        }
        if self.fields.len() > MAX_FIELDS {
            return Some(format!("Item exceeds maximum of {} fields", MAX_FIELDS));
        }
        if self.fields.contains_key("id") {
            return Some("Field 'id' is assigned by the server".to_string());
        }
        None
    }
}

/// Request body for POST /api/forms/:form
///
/// Flat object of scalar form fields.
#[derive(Debug, Clone, Deserialize)]
pub struct FormSubmission {
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl FormSubmission {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.fields.is_empty() {
            return Some("Form submission cannot be empty".to_string());
        }
        if self.fields.len() > MAX_FIELDS {
            return Some(format!("Form exceeds maximum of {} fields", MAX_FIELDS));
        }
        if let Some((name, _)) = self
            .fields
            .iter()
            .find(|(_, value)| value.is_object() || value.is_array())
        {
            return Some(format!("Field '{}' must be a plain value", name));
        }
        None
    }
}
