//! Weightlog Storage Engine
//!
//! This module owns the on-disk weight series:
//!
//! - **types**: Core data structures (WeightEntry, UpsertOutcome)
//! - **store**: SQLite-backed store with atomic CRUD primitives
//! - **error**: Error types
//!
//! The store enforces the one-entry-per-date invariant; callers never see a
//! duplicate-date conflict, only an insert-or-update outcome.
//!
//! # Example
//!
//! ```rust,no_run
//! use weightlog::storage::{UpsertOutcome, WeightStore};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = WeightStore::open("./weightlog_data/weights.db")?;
//!
//!     match store.upsert(75.5, "2024-01-01")? {
//!         UpsertOutcome::Inserted(id) => println!("recorded entry {}", id),
//!         UpsertOutcome::Updated(id) => println!("replaced entry {}", id),
//!     }
//!
//!     for entry in store.list_all()? {
//!         println!("{} {:.1}", entry.date, entry.weight);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod store;
pub mod types;

pub use error::{StorageError, StorageResult};
pub use store::WeightStore;
pub use types::{UpsertOutcome, WeightEntry};
