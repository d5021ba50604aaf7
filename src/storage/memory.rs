//! Process-local record store.
//!
//! Same collection semantics as [`JsonStore`](super::JsonStore) without the
//! file. Used for throwaway sessions (`backend = "memory"`) and in tests.

use crate::domain::error::Result;
use crate::storage::backend::Storage;
use crate::storage::models::{CarRecord, FuelRecord, WriteBatch};
use crate::storage::tables::Tables;

/// In-memory record store. Contents are lost when it is dropped.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    tables: Tables,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Creates an empty store at the current schema version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tables: Tables::fresh(),
        }
    }
}

impl Storage for MemoryStore {
    fn put_car(&mut self, record: &CarRecord) -> Result<i64> {
        self.tables.put_car(record)
    }

    fn get_car(&self, id: i64) -> Result<Option<CarRecord>> {
        Ok(self.tables.get_car(id))
    }

    fn delete_car(&mut self, id: i64) -> Result<()> {
        self.tables.delete_car(id);
        Ok(())
    }

    fn scan_cars(&self) -> Result<Vec<CarRecord>> {
        Ok(self.tables.cars())
    }

    fn put_fuel(&mut self, record: &FuelRecord) -> Result<i64> {
        self.tables.put_fuel(record)
    }

    fn get_fuel(&self, id: i64) -> Result<Option<FuelRecord>> {
        Ok(self.tables.get_fuel(id))
    }

    fn delete_fuel(&mut self, id: i64) -> Result<()> {
        self.tables.delete_fuel(id);
        Ok(())
    }

    fn scan_fuel_by_car(&self, car_id: i64) -> Result<Vec<FuelRecord>> {
        Ok(self.tables.fuel_for_car(car_id))
    }

    fn commit(&mut self, batch: &WriteBatch) -> Result<Vec<i64>> {
        self.tables.apply(batch)
    }

    fn schema_version(&self) -> u32 {
        self.tables.snapshot().version
    }
}
