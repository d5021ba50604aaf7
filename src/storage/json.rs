//! JSON file-based record store.
//!
//! The whole database lives in one human-readable JSON file. Every mutation
//! rewrites the file atomically (write-to-temp + rename), so a crash leaves
//! either the old or the new database on disk, never a torn one.
//!
//! # Performance Characteristics
//!
//! - **Read**: O(1) file access; the database is loaded once on open
//! - **Write**: O(n), the full snapshot is serialized per transaction
//! - **Best for**: a personal garage of cars with a few thousand fill-ups
//!
//! # File Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "next_ids": { "cars": 2, "fuel": 3 },
//!   "cars": {
//!     "1": { "id": 1, "year": 2020, "make": "Honda", "model": "Civic",
//!            "purchase": "2020-03-14", "mileage": 12 }
//!   },
//!   "fuel": {
//!     "1": { "id": 1, "car": 1, "date": "2024-05-01", "mileage": 10000,
//!            "price": 3.459, "quantity": 11.2, "total": 38.74,
//!            "partial": false, "missed": false }
//!   }
//! }
//! ```

use crate::domain::error::{FuelTrackerError, Result};
use crate::storage::backend::Storage;
use crate::storage::models::{CarRecord, FuelRecord, WriteBatch};
use crate::storage::tables::{Snapshot, Tables};
use std::path::{Path, PathBuf};

/// JSON file record store.
///
/// # Thread Safety
///
/// This type is `Send` but not `Sync`. It is owned by the single worker that
/// services repository requests.
#[derive(Debug)]
pub struct JsonStore {
    /// Path to the JSON file on disk.
    file_path: PathBuf,

    /// Live collections, always equal to the last durable snapshot.
    tables: Tables,
}

impl JsonStore {
    /// Opens the store, creating it on first use.
    ///
    /// A missing file is a version-0 database: both collections and the `car`
    /// index are created and written out. An older file is upgraded and
    /// rewritten. Parent directories are created automatically.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory creation fails
    /// - The file exists but is not a valid database
    /// - The file was written by a newer schema version
    pub fn open(file_path: PathBuf) -> Result<Self> {
        let _span = tracing::debug_span!("json_store_open", path = ?file_path).entered();

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let snapshot = if file_path.exists() {
            tracing::debug!("loading existing database");
            Self::load_from_file(&file_path)?
        } else {
            tracing::debug!("no database yet, creating");
            Snapshot::uninitialized()
        };

        let stored_version = snapshot.version;
        let tables = Tables::open(snapshot)?;
        let store = Self { file_path, tables };

        if stored_version != store.tables.snapshot().version {
            store.save_to_file()?;
        }

        tracing::debug!(
            cars = store.tables.snapshot().cars.len(),
            fuel = store.tables.snapshot().fuel.len(),
            "database opened"
        );
        Ok(store)
    }

    /// Location of the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn load_from_file(path: &Path) -> Result<Snapshot> {
        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents)
            .map_err(|e| FuelTrackerError::Storage(format!("failed to parse database: {e}")))
    }

    fn save_to_file(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(self.tables.snapshot())
            .map_err(|e| FuelTrackerError::Storage(format!("failed to serialize database: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        tracing::trace!(tmp_path = ?tmp_path, "writing to temporary file");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        tracing::trace!("database saved");
        Ok(())
    }

    /// Runs `op` against the tables and makes the result durable.
    ///
    /// If `op` or the save fails the tables are restored to their state
    /// before `op`.
    fn transact<T>(&mut self, op: impl FnOnce(&mut Tables) -> Result<T>) -> Result<T> {
        let before = self.tables.clone();
        let out = match op(&mut self.tables) {
            Ok(out) => out,
            Err(e) => {
                self.tables = before;
                return Err(e);
            }
        };

        if let Err(e) = self.save_to_file() {
            tracing::warn!(error = %e, "write failed, rolling back");
            self.tables = before;
            return Err(e);
        }
        Ok(out)
    }
}

impl Storage for JsonStore {
    fn put_car(&mut self, record: &CarRecord) -> Result<i64> {
        let _span = tracing::debug_span!("json_put_car", id = ?record.id).entered();
        let id = self.transact(|tables| tables.put_car(record))?;
        tracing::debug!(car_id = id, "car stored");
        Ok(id)
    }

    fn get_car(&self, id: i64) -> Result<Option<CarRecord>> {
        Ok(self.tables.get_car(id))
    }

    fn delete_car(&mut self, id: i64) -> Result<()> {
        let _span = tracing::debug_span!("json_delete_car", car_id = id).entered();
        if self.tables.get_car(id).is_none() {
            tracing::debug!("car absent, nothing to delete");
            return Ok(());
        }
        self.transact(|tables| Ok(tables.delete_car(id)))?;
        Ok(())
    }

    fn scan_cars(&self) -> Result<Vec<CarRecord>> {
        let cars = self.tables.cars();
        tracing::debug!(count = cars.len(), "scanned cars");
        Ok(cars)
    }

    fn put_fuel(&mut self, record: &FuelRecord) -> Result<i64> {
        let _span = tracing::debug_span!("json_put_fuel", id = ?record.id, car_id = record.car).entered();
        let id = self.transact(|tables| tables.put_fuel(record))?;
        tracing::debug!(fuel_id = id, "fill-up stored");
        Ok(id)
    }

    fn get_fuel(&self, id: i64) -> Result<Option<FuelRecord>> {
        Ok(self.tables.get_fuel(id))
    }

    fn delete_fuel(&mut self, id: i64) -> Result<()> {
        let _span = tracing::debug_span!("json_delete_fuel", fuel_id = id).entered();
        if self.tables.get_fuel(id).is_none() {
            tracing::debug!("fill-up absent, nothing to delete");
            return Ok(());
        }
        self.transact(|tables| Ok(tables.delete_fuel(id)))?;
        Ok(())
    }

    fn scan_fuel_by_car(&self, car_id: i64) -> Result<Vec<FuelRecord>> {
        let records = self.tables.fuel_for_car(car_id);
        tracing::debug!(car_id = car_id, count = records.len(), "scanned fill-ups by car index");
        Ok(records)
    }

    fn commit(&mut self, batch: &WriteBatch) -> Result<Vec<i64>> {
        let _span = tracing::debug_span!("json_commit", ops = batch.len()).entered();
        if batch.is_empty() {
            return Ok(Vec::new());
        }
        let ids = self.transact(|tables| tables.apply(batch))?;
        tracing::debug!("batch committed");
        Ok(ids)
    }

    fn schema_version(&self) -> u32 {
        self.tables.snapshot().version
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::models::WriteOp;
    use crate::storage::tables::SCHEMA_VERSION;

    fn car() -> CarRecord {
        CarRecord {
            id: None,
            year: 2020,
            make: "Honda".to_string(),
            model: "Civic".to_string(),
            purchase: "2020-03-14".to_string(),
            mileage: 12,
        }
    }

    #[test]
    fn first_open_creates_the_file_at_current_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("db.json");

        let store = JsonStore::open(path.clone()).unwrap();
        assert!(path.exists());
        assert_eq!(store.schema_version(), SCHEMA_VERSION);
    }

    #[test]
    fn data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");

        let id = {
            let mut store = JsonStore::open(path.clone()).unwrap();
            store.put_car(&car()).unwrap()
        };

        let store = JsonStore::open(path).unwrap();
        let stored = store.get_car(id).unwrap().unwrap();
        assert_eq!(stored.make, "Honda");
        assert_eq!(stored.id, Some(id));
    }

    #[test]
    fn newer_schema_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        std::fs::write(&path, r#"{"version": 99}"#).unwrap();

        let err = JsonStore::open(path).unwrap_err();
        assert!(matches!(err, FuelTrackerError::Storage(_)));
    }

    #[test]
    fn corrupt_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(JsonStore::open(path), Err(FuelTrackerError::Storage(_))));
    }

    #[test]
    fn largest_possible_id_in_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        std::fs::write(
            &path,
            r#"{"version":1,"cars":{"9223372036854775807":{"year":2020,"make":"Honda","model":"Civic","purchase":"2020-03-14","mileage":12}},"fuel":{}}"#,
        )
        .unwrap();

        assert!(matches!(JsonStore::open(path), Err(FuelTrackerError::Storage(_))));
    }

    #[test]
    fn put_past_the_id_space_is_refused_and_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        let mut store = JsonStore::open(path.clone()).unwrap();
        store.put_car(&car()).unwrap();
        let on_disk = std::fs::read_to_string(&path).unwrap();

        let record = CarRecord { id: Some(i64::MAX), ..car() };
        assert!(matches!(store.put_car(&record), Err(FuelTrackerError::Storage(_))));
        assert!(store.get_car(i64::MAX).unwrap().is_none());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), on_disk);
    }

    #[test]
    fn failed_write_leaves_store_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let db_dir = dir.path().join("db");
        let mut store = JsonStore::open(db_dir.join("db.json")).unwrap();
        let id = store.put_car(&car()).unwrap();

        std::fs::remove_dir_all(&db_dir).unwrap();

        let mut batch = WriteBatch::new();
        batch.push(WriteOp::DeleteCar(id)).push(WriteOp::PutCar(car()));
        assert!(store.commit(&batch).is_err());
        assert!(store.put_car(&car()).is_err());

        assert_eq!(store.scan_cars().unwrap().len(), 1);
        assert!(store.get_car(id).unwrap().is_some());
    }

    #[test]
    fn deleting_absent_ids_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonStore::open(dir.path().join("db.json")).unwrap();
        assert!(store.delete_car(42).is_ok());
        assert!(store.delete_fuel(42).is_ok());
    }
}
