//! Record store abstraction.
//!
//! This module defines the [`Storage`] trait over the two collections the
//! application persists, `cars` and `fuel`. Each collection is keyed by an
//! auto-incrementing integer id assigned by the store; `fuel` is additionally
//! indexed by its owning car.
//!
//! # Guarantees
//!
//! - Every `put`, `delete` and `commit` is a single durable transaction. When
//!   it fails the store is left exactly as it was.
//! - Deleting an absent id succeeds without doing anything.
//! - Reads return collections unsorted; presentation order is computed by
//!   [`crate::domain::ordering`].
//! - Errors are never retried internally.

use crate::domain::error::Result;
use crate::storage::models::{CarRecord, FuelRecord, WriteBatch};

/// Abstraction over persistent record stores.
///
/// # Implementations
///
/// - [`JsonStore`](crate::storage::JsonStore): JSON file with atomic writes
/// - [`MemoryStore`](crate::storage::MemoryStore): process-local, for ephemeral sessions
///
/// # Examples
///
/// ```no_run
/// use fuel_tracker::storage::{CarRecord, JsonStore, Storage};
/// use std::path::PathBuf;
///
/// let mut store = JsonStore::open(PathBuf::from("/tmp/fueltracker.json"))?;
/// let id = store.put_car(&CarRecord {
///     id: None,
///     year: 2020,
///     make: "Honda".to_string(),
///     model: "Civic".to_string(),
///     purchase: "2020-03-14".to_string(),
///     mileage: 12,
/// })?;
/// assert!(store.get_car(id)?.is_some());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Storage: Send {
    /// Inserts a car (no id) or replaces the car with the record's id.
    ///
    /// Returns the assigned or confirmed id.
    ///
    /// # Errors
    ///
    /// Returns an error if the write cannot be made durable.
    fn put_car(&mut self, record: &CarRecord) -> Result<i64>;

    /// Looks up a car by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    fn get_car(&self, id: i64) -> Result<Option<CarRecord>>;

    /// Removes a car. Absent ids are a no-op.
    ///
    /// This does not touch the car's fill-ups; cascading is the repository's job.
    ///
    /// # Errors
    ///
    /// Returns an error if the write cannot be made durable.
    fn delete_car(&mut self, id: i64) -> Result<()>;

    /// Reads every car with a full scan.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    fn scan_cars(&self) -> Result<Vec<CarRecord>>;

    /// Inserts a fill-up (no id) or replaces the fill-up with the record's id.
    ///
    /// # Errors
    ///
    /// Returns an error if the write cannot be made durable.
    fn put_fuel(&mut self, record: &FuelRecord) -> Result<i64>;

    /// Looks up a fill-up by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    fn get_fuel(&self, id: i64) -> Result<Option<FuelRecord>>;

    /// Removes a fill-up. Absent ids are a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the write cannot be made durable.
    fn delete_fuel(&mut self, id: i64) -> Result<()>;

    /// Reads the fill-ups of one car through the `car` index.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    fn scan_fuel_by_car(&self, car_id: i64) -> Result<Vec<FuelRecord>>;

    /// Commits a batch of writes as one all-or-nothing transaction.
    ///
    /// Returns the id touched by each operation, in batch order.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be made durable; none of the
    /// batch's writes are then visible.
    fn commit(&mut self, batch: &WriteBatch) -> Result<Vec<i64>>;

    /// Schema version of the open store.
    fn schema_version(&self) -> u32;
}
