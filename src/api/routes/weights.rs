//! Weight Routes
//!
//! CRUD endpoints over the weight series.
//!
//! - GET /weights - List all entries, ascending by date
//! - POST /weights - Record a weight for a date (insert-or-update)
//! - PUT /weights - Change the weight of an entry by id
//! - DELETE /weights - Delete one entry by id, or every entry
//! - GET /weights/latest - The most recent entry

use axum::{extract::State, Json};
use chrono::NaiveDate;
use std::sync::Arc;

use crate::api::dto::{
    CreateWeightRequest, CreateWeightResponse, DeleteWeightRequest, DeleteWeightResponse,
    UpdateWeightRequest, UpdateWeightResponse, WeightResponse,
};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::storage::UpsertOutcome;

/// GET /weights
///
/// List all weight entries, ascending by date.
pub async fn list_weights(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<WeightResponse>>> {
    let entries = state.store.list_all()?;

    Ok(Json(entries.iter().map(WeightResponse::from).collect()))
}

/// GET /weights/latest
///
/// The entry with the maximum date; 404 while the series is empty.
pub async fn latest_weight(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<WeightResponse>> {
    let entry = state
        .store
        .latest()?
        .ok_or_else(|| ApiError::NotFound("No weight entries recorded".to_string()))?;

    Ok(Json(WeightResponse::from(&entry)))
}

/// POST /weights
///
/// Record a weight for a date. A second write for the same date replaces the
/// stored weight in place; the caller is told which branch was taken.
pub async fn create_weight(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateWeightRequest>,
) -> ApiResult<Json<CreateWeightResponse>> {
    let (weight, date) = validate_create_request(&req)?;

    match state.store.upsert(weight, date)? {
        UpsertOutcome::Inserted(id) => {
            tracing::info!(id, date = %date, weight, "Recorded weight entry");
            Ok(Json(CreateWeightResponse::inserted(id)))
        }
        UpsertOutcome::Updated(id) => {
            tracing::info!(id, date = %date, weight, "Replaced weight for date");
            Ok(Json(CreateWeightResponse::updated()))
        }
    }
}

/// PUT /weights
///
/// Change the weight of an existing entry by id. Never creates an entry.
pub async fn update_weight(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdateWeightRequest>,
) -> ApiResult<Json<UpdateWeightResponse>> {
    let (id, weight) = validate_update_request(&req)?;

    let changed = state.store.update_weight(id, weight)?;
    if changed == 0 {
        return Err(ApiError::NotFound(format!("No weight entry with id {}", id)));
    }

    tracing::info!(id, weight, "Updated weight entry");
    Ok(Json(UpdateWeightResponse { success: true }))
}

/// DELETE /weights
///
/// Delete a single entry by id, or the whole series when `deleteAll` is set.
pub async fn delete_weight(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DeleteWeightRequest>,
) -> ApiResult<Json<DeleteWeightResponse>> {
    if req.delete_all {
        let deleted = state.store.delete_all()?;
        tracing::info!(deleted, "Cleared weight series");
        return Ok(Json(DeleteWeightResponse {
            success: true,
            deleted,
        }));
    }

    let id = req
        .id
        .ok_or_else(|| ApiError::Validation("id must be a number".to_string()))?;

    let deleted = state.store.delete_by_id(id)?;
    if deleted == 0 {
        return Err(ApiError::NotFound(format!("No weight entry with id {}", id)));
    }

    tracing::info!(id, "Deleted weight entry");
    Ok(Json(DeleteWeightResponse {
        success: true,
        deleted,
    }))
}

/// Validate a create request, returning the checked (weight, date) pair
fn validate_create_request(req: &CreateWeightRequest) -> ApiResult<(f64, &str)> {
    let weight = req
        .weight
        .ok_or_else(|| ApiError::Validation("weight must be a number".to_string()))?;

    if !weight.is_finite() || weight <= 0.0 {
        return Err(ApiError::Validation(
            "weight must be a finite number greater than zero".to_string(),
        ));
    }

    let date = req
        .date
        .as_deref()
        .filter(|d| !d.is_empty())
        .ok_or_else(|| ApiError::Validation("date is required".to_string()))?;

    // Ascending order relies on ISO text ordering, so the format is enforced
    if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
        return Err(ApiError::Validation(format!(
            "Invalid date: {} (expected YYYY-MM-DD)",
            date
        )));
    }

    Ok((weight, date))
}

/// Validate an update request, returning the checked (id, weight) pair
fn validate_update_request(req: &UpdateWeightRequest) -> ApiResult<(i64, f64)> {
    let id = req
        .id
        .ok_or_else(|| ApiError::Validation("id must be a number".to_string()))?;

    let weight = req
        .weight
        .ok_or_else(|| ApiError::Validation("weight must be a number".to_string()))?;

    if !weight.is_finite() || weight <= 0.0 {
        return Err(ApiError::Validation(
            "weight must be a finite number greater than zero".to_string(),
        ));
    }

    Ok((id, weight))
}
