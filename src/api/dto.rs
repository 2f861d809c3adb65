//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.
//!
//! Request fields are `Option` so that a missing or null field reaches the
//! handler's validation step and produces a taxonomy error instead of a
//! framework rejection.

use serde::{Deserialize, Serialize};

use crate::storage::WeightEntry;

// ============================================
// REQUEST DTOs
// ============================================

/// POST /weights body
#[derive(Debug, Deserialize)]
pub struct CreateWeightRequest {
    /// Measured weight
    #[serde(default)]
    pub weight: Option<f64>,
    /// Calendar date, `YYYY-MM-DD`
    #[serde(default)]
    pub date: Option<String>,
}

/// PUT /weights body
#[derive(Debug, Deserialize)]
pub struct UpdateWeightRequest {
    /// Id of the entry to change
    #[serde(default)]
    pub id: Option<i64>,
    /// Replacement weight
    #[serde(default)]
    pub weight: Option<f64>,
}

/// DELETE /weights body: either a single id or the bulk-clear flag
#[derive(Debug, Deserialize)]
pub struct DeleteWeightRequest {
    /// Id of the entry to delete
    #[serde(default)]
    pub id: Option<i64>,
    /// Delete every entry instead of a single one
    #[serde(default, rename = "deleteAll")]
    pub delete_all: bool,
}

// ============================================
// RESPONSE DTOs
// ============================================

/// A weight entry as served to the UI collaborator
#[derive(Debug, Serialize)]
pub struct WeightResponse {
    pub id: i64,
    pub weight: f64,
    pub date: String,
}

impl From<&WeightEntry> for WeightResponse {
    fn from(entry: &WeightEntry) -> Self {
        Self {
            id: entry.id,
            weight: entry.weight,
            date: entry.date.clone(),
        }
    }
}

/// POST /weights response
#[derive(Debug, Serialize)]
pub struct CreateWeightResponse {
    pub success: bool,
    /// Present when a new entry was inserted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Present (true) when an existing date's weight was replaced
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<bool>,
}

impl CreateWeightResponse {
    pub fn inserted(id: i64) -> Self {
        Self {
            success: true,
            id: Some(id),
            updated: None,
        }
    }

    pub fn updated() -> Self {
        Self {
            success: true,
            id: None,
            updated: Some(true),
        }
    }
}

/// PUT /weights response
#[derive(Debug, Serialize)]
pub struct UpdateWeightResponse {
    pub success: bool,
}

/// DELETE /weights response
#[derive(Debug, Serialize)]
pub struct DeleteWeightResponse {
    pub success: bool,
    /// Number of entries removed
    pub deleted: usize,
}

/// Full health status response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub storage: String,
    pub entries: u64,
    pub uptime_seconds: u64,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_response_inserted_shape() {
        let json = serde_json::to_value(CreateWeightResponse::inserted(4)).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["id"], 4);
        assert!(json.get("updated").is_none());
    }

    #[test]
    fn test_create_response_updated_shape() {
        let json = serde_json::to_value(CreateWeightResponse::updated()).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["updated"], true);
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_delete_request_accepts_both_forms() {
        let single: DeleteWeightRequest = serde_json::from_str(r#"{"id": 3}"#).unwrap();
        assert_eq!(single.id, Some(3));
        assert!(!single.delete_all);

        let bulk: DeleteWeightRequest = serde_json::from_str(r#"{"deleteAll": true}"#).unwrap();
        assert!(bulk.id.is_none());
        assert!(bulk.delete_all);
    }
}
