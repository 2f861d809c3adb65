//! Core data types for the weight store
//!
//! - `WeightEntry`: a single persisted (date, weight) observation
//! - `UpsertOutcome`: whether an upsert inserted a new entry or replaced one

use serde::{Deserialize, Serialize};

/// A single persisted body-weight measurement
///
/// Exactly one entry exists per calendar date; the store assigns `id` and
/// `created_at` on first insertion and never changes them afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeightEntry {
    /// Store-assigned identifier, monotonically increasing
    pub id: i64,
    /// Measured weight, finite and greater than zero
    pub weight: f64,
    /// Calendar date in ISO 8601 `YYYY-MM-DD` form, unique across entries
    pub date: String,
    /// Timestamp of first insertion, untouched by later overwrites
    pub created_at: String,
}

/// Result of an atomic insert-or-update for a date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No entry existed for the date; a new one was created with this id
    Inserted(i64),
    /// An entry already existed for the date; its weight was replaced
    Updated(i64),
}

impl UpsertOutcome {
    /// Id of the entry the upsert landed on, regardless of branch
    pub fn id(&self) -> i64 {
        match self {
            UpsertOutcome::Inserted(id) | UpsertOutcome::Updated(id) => *id,
        }
    }

    /// True when the upsert replaced an existing entry's weight
    pub fn is_update(&self) -> bool {
        matches!(self, UpsertOutcome::Updated(_))
    }
}
