//! Weight Store - SQLite-backed persistence for the daily weight series
//!
//! One table, one row per calendar date. The store opens its connection once
//! and shares it for the process lifetime; every public operation is a single
//! bounded unit of work.
//!
//! # Concurrency
//!
//! The connection lives behind a `std::sync::Mutex` (SQLite handles are not
//! `Sync`). The only cross-operation race that matters is two concurrent
//! upserts for the same not-yet-existing date: the mutex plus an IMMEDIATE
//! transaction serialize the existence check and the write into one atomic
//! unit, so exactly one entry results and the later writer's value wins.

use crate::storage::error::{StorageError, StorageResult};
use crate::storage::types::{UpsertOutcome, WeightEntry};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension, TransactionBehavior};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// SQLite-backed store for the weight series
pub struct WeightStore {
    conn: Mutex<Connection>,
    path: PathBuf,
}

impl WeightStore {
    /// Open (or create) a store at the given database path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        // Configure for performance
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
            ",
        )?;

        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
            path,
        })
    }

    /// Open an in-memory store (tests, benchmarks)
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
            path: PathBuf::from(":memory:"),
        })
    }

    fn init_schema(conn: &Connection) -> StorageResult<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS weights (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                weight     REAL NOT NULL,
                date       TEXT NOT NULL UNIQUE,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            )",
            [],
        )?;

        Ok(())
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StorageError::Lock(format!("Failed to acquire store lock: {}", e)))
    }

    /// Insert a weight for a date, or replace the weight if the date exists
    ///
    /// The existence check and the write run inside one IMMEDIATE transaction
    /// while the connection lock is held, so concurrent upserts for the same
    /// new date cannot both insert.
    pub fn upsert(&self, weight: f64, date: &str) -> StorageResult<UpsertOutcome> {
        check_weight(weight)?;

        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let existing: Option<i64> = tx
            .query_row(
                "SELECT id FROM weights WHERE date = ?1",
                params![date],
                |row| row.get(0),
            )
            .optional()?;

        let outcome = match existing {
            Some(id) => {
                tx.execute(
                    "UPDATE weights SET weight = ?1 WHERE id = ?2",
                    params![weight, id],
                )?;
                UpsertOutcome::Updated(id)
            }
            None => {
                tx.execute(
                    "INSERT INTO weights (weight, date) VALUES (?1, ?2)",
                    params![weight, date],
                )?;
                UpsertOutcome::Inserted(tx.last_insert_rowid())
            }
        };

        tx.commit()?;
        Ok(outcome)
    }

    /// All entries, ascending by date, freshly computed on each call
    pub fn list_all(&self) -> StorageResult<Vec<WeightEntry>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare_cached(
            "SELECT id, weight, date, created_at FROM weights ORDER BY date ASC",
        )?;

        let entries = stmt
            .query_map([], entry_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// The entry with the maximum date, or `None` when the series is empty
    pub fn latest(&self) -> StorageResult<Option<WeightEntry>> {
        let conn = self.lock()?;
        let entry = conn
            .query_row(
                "SELECT id, weight, date, created_at FROM weights
                 ORDER BY date DESC
                 LIMIT 1",
                [],
                entry_from_row,
            )
            .optional()?;

        Ok(entry)
    }

    /// Replace the weight of an existing entry by id
    ///
    /// Returns the number of rows changed: 0 means no entry with this id.
    /// Never creates an entry.
    pub fn update_weight(&self, id: i64, weight: f64) -> StorageResult<usize> {
        check_weight(weight)?;

        let conn = self.lock()?;
        let changed = conn.execute(
            "UPDATE weights SET weight = ?1 WHERE id = ?2",
            params![weight, id],
        )?;

        Ok(changed)
    }

    /// Delete a single entry by id; returns the number of rows changed
    pub fn delete_by_id(&self, id: i64) -> StorageResult<usize> {
        let conn = self.lock()?;
        let changed = conn.execute("DELETE FROM weights WHERE id = ?1", params![id])?;

        Ok(changed)
    }

    /// Delete every entry; 0 is a valid result when the series was empty
    pub fn delete_all(&self) -> StorageResult<usize> {
        let conn = self.lock()?;
        let changed = conn.execute("DELETE FROM weights", [])?;

        Ok(changed)
    }

    /// Number of persisted entries
    pub fn count(&self) -> StorageResult<u64> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM weights", [], |row| row.get(0))?;

        Ok(count as u64)
    }

    /// Path of the backing database file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Invariant check applied at the point of persistence
fn check_weight(weight: f64) -> StorageResult<()> {
    if !weight.is_finite() || weight <= 0.0 {
        return Err(StorageError::InvalidWeight(weight));
    }

    Ok(())
}

fn entry_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<WeightEntry> {
    Ok(WeightEntry {
        id: row.get(0)?,
        weight: row.get(1)?,
        date: row.get(2)?,
        created_at: row.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[test]
    fn test_store_creation() {
        let store = WeightStore::open_in_memory().unwrap();
        assert_eq!(store.count().unwrap(), 0);
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_upsert_insert_then_update() {
        let store = WeightStore::open_in_memory().unwrap();

        let first = store.upsert(75.5, "2024-01-01").unwrap();
        assert_eq!(first, UpsertOutcome::Inserted(1));
        assert_eq!(store.count().unwrap(), 1);

        // Second write for the same date replaces the weight in place
        let second = store.upsert(76.0, "2024-01-01").unwrap();
        assert_eq!(second, UpsertOutcome::Updated(1));
        assert_eq!(store.count().unwrap(), 1);

        let entries = store.list_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, 1);
        assert_eq!(entries[0].weight, 76.0);
        assert_eq!(entries[0].date, "2024-01-01");
    }

    #[test]
    fn test_list_ascending_by_date() {
        let store = WeightStore::open_in_memory().unwrap();

        store.upsert(75.5, "2024-01-01").unwrap();
        store.upsert(76.0, "2024-01-01").unwrap();
        store.upsert(74.0, "2023-12-31").unwrap();

        let entries = store.list_all().unwrap();
        assert_eq!(entries.len(), 2);

        // Earlier date first even though it was inserted later
        assert_eq!(entries[0].id, 2);
        assert_eq!(entries[0].weight, 74.0);
        assert_eq!(entries[0].date, "2023-12-31");
        assert_eq!(entries[1].id, 1);
        assert_eq!(entries[1].weight, 76.0);
        assert_eq!(entries[1].date, "2024-01-01");
    }

    #[test]
    fn test_list_order_regardless_of_insertion_order() {
        let store = WeightStore::open_in_memory().unwrap();

        for date in ["2024-03-05", "2024-01-20", "2024-02-11", "2024-01-02"] {
            store.upsert(80.0, date).unwrap();
        }

        let entries = store.list_all().unwrap();
        let dates: Vec<String> = entries.iter().map(|e| e.date.clone()).collect();

        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted);
        assert_eq!(dates.len(), 4);
    }

    #[test]
    fn test_ids_monotonically_increasing() {
        let store = WeightStore::open_in_memory().unwrap();

        let a = store.upsert(70.0, "2024-01-01").unwrap().id();
        let b = store.upsert(71.0, "2024-01-02").unwrap().id();
        let c = store.upsert(72.0, "2024-01-03").unwrap().id();

        assert!(a < b && b < c);
    }

    #[test]
    fn test_latest() {
        let store = WeightStore::open_in_memory().unwrap();
        assert!(store.latest().unwrap().is_none());

        store.upsert(75.0, "2024-01-15").unwrap();
        store.upsert(74.0, "2024-01-10").unwrap();
        store.upsert(76.0, "2024-01-20").unwrap();

        let latest = store.latest().unwrap().unwrap();
        assert_eq!(latest.date, "2024-01-20");
        assert_eq!(latest.weight, 76.0);
    }

    #[test]
    fn test_update_weight() {
        let store = WeightStore::open_in_memory().unwrap();

        let id = store.upsert(75.0, "2024-01-01").unwrap().id();
        assert_eq!(store.update_weight(id, 77.5).unwrap(), 1);

        let entry = store.latest().unwrap().unwrap();
        assert_eq!(entry.weight, 77.5);
    }

    #[test]
    fn test_update_weight_missing_id() {
        let store = WeightStore::open_in_memory().unwrap();
        store.upsert(75.0, "2024-01-01").unwrap();

        // Unknown id changes nothing and leaves existing entries untouched
        assert_eq!(store.update_weight(999, 80.0).unwrap(), 0);

        let entries = store.list_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].weight, 75.0);
    }

    #[test]
    fn test_delete_by_id() {
        let store = WeightStore::open_in_memory().unwrap();

        store.upsert(75.5, "2024-01-01").unwrap();
        store.upsert(76.0, "2024-01-01").unwrap();
        store.upsert(74.0, "2023-12-31").unwrap();

        assert_eq!(store.delete_by_id(1).unwrap(), 1);
        assert_eq!(store.delete_by_id(1).unwrap(), 0);

        let entries = store.list_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, 2);
        assert_eq!(entries[0].date, "2023-12-31");
        assert_eq!(entries[0].weight, 74.0);
    }

    #[test]
    fn test_delete_all() {
        let store = WeightStore::open_in_memory().unwrap();

        // Empty set: 0 changed rows, not an error
        assert_eq!(store.delete_all().unwrap(), 0);

        store.upsert(75.0, "2024-01-01").unwrap();
        store.upsert(76.0, "2024-01-02").unwrap();

        assert_eq!(store.delete_all().unwrap(), 2);
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_created_at_survives_overwrite() {
        let store = WeightStore::open_in_memory().unwrap();

        store.upsert(75.0, "2024-01-01").unwrap();
        let before = store.list_all().unwrap()[0].clone();

        store.upsert(76.0, "2024-01-01").unwrap();
        let after = store.list_all().unwrap()[0].clone();

        assert_eq!(after.id, before.id);
        assert_eq!(after.created_at, before.created_at);
        assert_eq!(after.weight, 76.0);
    }

    #[test]
    fn test_invalid_weight_rejected() {
        let store = WeightStore::open_in_memory().unwrap();

        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = store.upsert(bad, "2024-01-01").unwrap_err();
            assert!(matches!(err, StorageError::InvalidWeight(_)));
        }

        assert_eq!(store.count().unwrap(), 0);

        let id = store.upsert(75.0, "2024-01-01").unwrap().id();
        assert!(matches!(
            store.update_weight(id, -2.0),
            Err(StorageError::InvalidWeight(_))
        ));
    }

    #[test]
    fn test_concurrent_upserts_same_new_date() {
        let store = Arc::new(WeightStore::open_in_memory().unwrap());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.upsert(70.0 + i as f64, "2024-01-01").unwrap())
            })
            .collect();

        let outcomes: Vec<UpsertOutcome> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();

        // Exactly one writer inserts; the rest resolve as updates
        let inserts = outcomes.iter().filter(|o| !o.is_update()).count();
        assert_eq!(inserts, 1);
        assert_eq!(store.count().unwrap(), 1);

        // The surviving weight is one of the written values
        let entry = store.latest().unwrap().unwrap();
        assert!((0..8).any(|i| entry.weight == 70.0 + i as f64));
    }

    #[test]
    fn test_persistence_across_reopen() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("weights.db");

        {
            let store = WeightStore::open(&db_path).unwrap();
            store.upsert(75.5, "2024-01-01").unwrap();
            store.upsert(74.0, "2023-12-31").unwrap();
        }

        {
            let store = WeightStore::open(&db_path).unwrap();
            let entries = store.list_all().unwrap();
            assert_eq!(entries.len(), 2);
            assert_eq!(entries[0].date, "2023-12-31");
            assert_eq!(entries[1].date, "2024-01-01");

            // Id assignment continues after reopen
            let id = store.upsert(73.0, "2024-01-02").unwrap().id();
            assert_eq!(id, 3);
        }
    }
}
