//! Catalog Module
//!
//! In-memory reference data served by the API: training programs, their
//! categories, appointments and the other listings the back office reads.
//! It plays the part of the database behind the cache, so every lookup is
//! counted.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use serde_json::{json, Map, Value};
use tokio::sync::RwLock;
use tracing::info;

use crate::error::{ApiError, Result};
use crate::models::{FormReceipt, ListResponse};

/// Public forms accepted by the submission endpoint.
pub const FORMS: &[&str] = &["contact", "reclamation", "rendezvous"];

/// Resources known to the catalog.
pub const RESOURCES: &[&str] = &[
    "categories",
    "formations",
    "rendezvous",
    "reclamations",
    "actions-correctives",
    "veille",
    "competences",
];

// == Catalog ==
/// Resource name to list of JSON objects.
#[derive(Debug, Default)]
pub struct Catalog {
    resources: RwLock<HashMap<String, Vec<Value>>>,
    submissions: AtomicU64,
    loads: AtomicU64,
}

impl Catalog {
    /// Creates a catalog with every known resource and no rows.
    pub fn new() -> Self {
        let resources = RESOURCES
            .iter()
            .map(|name| (name.to_string(), Vec::new()))
            .collect();

        Self {
            resources: RwLock::new(resources),
            ..Default::default()
        }
    }

    /// Creates a catalog holding a small set of sample rows.
    pub fn seeded() -> Self {
        let mut resources: HashMap<String, Vec<Value>> = RESOURCES
            .iter()
            .map(|name| (name.to_string(), Vec::new()))
            .collect();

        resources.insert(
            "categories".to_string(),
            vec![
                json!({"id": 1, "nom": "Bureautique"}),
                json!({"id": 2, "nom": "Management"}),
                json!({"id": 3, "nom": "Langues"}),
            ],
        );
        resources.insert(
            "formations".to_string(),
            vec![
                json!({"id": 1, "titre": "Excel avancé", "categorie": 1, "niveau": "avance"}),
                json!({"id": 2, "titre": "Word initiation", "categorie": 1, "niveau": "debutant"}),
                json!({"id": 3, "titre": "Conduite de réunion", "categorie": 2, "niveau": "intermediaire"}),
                json!({"id": 4, "titre": "Anglais professionnel", "categorie": 3, "niveau": "intermediaire"}),
            ],
        );
        resources.insert(
            "rendezvous".to_string(),
            vec![json!({"id": 1, "apprenant": "A. Martin", "date": "2024-09-12", "statut": "confirme"})],
        );

        Self {
            resources: RwLock::new(resources),
            ..Default::default()
        }
    }

    // == List ==
    /// Returns the rows of `resource` whose fields match every filter.
    ///
    /// A filter matches when the field exists and its string form equals the
    /// filter value.
    pub async fn list(
        &self,
        resource: &str,
        filters: &HashMap<String, String>,
    ) -> Result<ListResponse> {
        self.loads.fetch_add(1, Ordering::Relaxed);

        let resources = self.resources.read().await;
        let rows = resources
            .get(resource)
            .ok_or_else(|| ApiError::NotFound(format!("Unknown resource: {}", resource)))?;

        let items: Vec<Value> = rows
            .iter()
            .filter(|row| filters.iter().all(|(field, wanted)| field_matches(row, field, wanted)))
            .cloned()
            .collect();

        Ok(ListResponse::new(resource, items))
    }

    // == Insert ==
    /// Appends a row to `resource` and returns it with its assigned id.
    pub async fn insert(&self, resource: &str, mut fields: Map<String, Value>) -> Result<Value> {
        let mut resources = self.resources.write().await;
        let rows = resources
            .get_mut(resource)
            .ok_or_else(|| ApiError::NotFound(format!("Unknown resource: {}", resource)))?;

        let next_id = rows
            .iter()
            .filter_map(|row| row.get("id").and_then(Value::as_u64))
            .max()
            .unwrap_or(0)
            + 1;
        fields.insert("id".to_string(), json!(next_id));

        let row = Value::Object(fields);
        rows.push(row.clone());
        info!(resource, id = next_id, "row created");
        Ok(row)
    }

    // == Record Submission ==
    /// Stores a public form submission and returns its receipt.
    pub async fn record_submission(
        &self,
        form: &str,
        fields: Map<String, Value>,
    ) -> Result<FormReceipt> {
        if !FORMS.contains(&form) {
            return Err(ApiError::NotFound(format!("Unknown form: {}", form)));
        }

        let receipt = FormReceipt {
            id: self.submissions.fetch_add(1, Ordering::Relaxed) + 1,
            form: form.to_string(),
            fields: fields.len(),
            received_at: Utc::now().to_rfc3339(),
        };
        info!(form, id = receipt.id, "form submission received");
        Ok(receipt)
    }

    /// Number of submissions received so far.
    pub fn submission_count(&self) -> u64 {
        self.submissions.load(Ordering::Relaxed)
    }

    /// Number of `list` calls served, hits on the cache excluded.
    pub fn loads(&self) -> u64 {
        self.loads.load(Ordering::Relaxed)
    }
}

fn field_matches(row: &Value, field: &str, wanted: &str) -> bool {
    match row.get(field) {
        Some(Value::String(s)) => s == wanted,
        Some(Value::Null) | None => false,
        Some(other) => other.to_string() == wanted,
    }
}
