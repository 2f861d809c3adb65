//! # Weightlog
//!
//! Daily body-weight tracker - a Rust service for recording and serving one
//! weight measurement per calendar date.
//!
//! ## Features
//!
//! - **One entry per date**: writes for an existing date replace the stored
//!   weight in place, atomically, instead of failing
//! - **Stable ordering**: listings are always ascending by date
//! - **Durable**: SQLite in WAL mode, opened once per process
//! - **REST API**: small CRUD surface for the UI collaborator
//!
//! ## Modules
//!
//! - [`storage`]: SQLite-backed weight store
//! - [`api`]: REST API server with Axum
//! - [`config`]: TOML + environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use weightlog::storage::{UpsertOutcome, WeightStore};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = WeightStore::open("./weightlog_data/weights.db")?;
//!
//!     // First write for a date inserts
//!     let outcome = store.upsert(75.5, "2024-01-01")?;
//!     assert!(matches!(outcome, UpsertOutcome::Inserted(_)));
//!
//!     // Second write for the same date replaces the weight, same id
//!     let outcome = store.upsert(76.0, "2024-01-01")?;
//!     assert!(outcome.is_update());
//!
//!     println!("{} entries", store.count()?);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod storage;

// Re-export top-level types for convenience
pub use storage::{StorageError, StorageResult, UpsertOutcome, WeightEntry, WeightStore};

pub use api::{build_router, serve, ApiConfig, ApiError, AppState};

pub use config::{
    ApiConfig as ConfigApiConfig, Config, ConfigError, LoggingConfig,
    StorageConfig as ConfigStorageConfig,
};
