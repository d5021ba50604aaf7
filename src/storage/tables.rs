//! In-memory tables shared by every storage backend.
//!
//! [`Tables`] holds the `cars` and `fuel` collections, their auto-increment
//! counters and the derived `car` index over `fuel`. Backends wrap it and add
//! persistence; all collection semantics live here so they behave identically.

use super::models::{CarRecord, FuelRecord, WriteBatch, WriteOp};
use crate::domain::error::{Collection, FuelTrackerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Schema version written by this build.
///
/// Bumped only on structural change. Files with a newer version are refused.
pub const SCHEMA_VERSION: u32 = 1;

/// Next id to hand out per collection. Ids start at 1 and are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextIds {
    pub cars: i64,
    pub fuel: i64,
}

impl Default for NextIds {
    fn default() -> Self {
        Self { cars: 1, fuel: 1 }
    }
}

/// Serialized form of the whole database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Schema version of this snapshot.
    pub version: u32,

    #[serde(default)]
    pub next_ids: NextIds,

    #[serde(default)]
    pub cars: BTreeMap<i64, CarRecord>,

    #[serde(default)]
    pub fuel: BTreeMap<i64, FuelRecord>,
}

/// The counter value following `id`.
///
/// # Errors
///
/// Returns [`FuelTrackerError::Storage`] when `id` is the largest possible id.
fn id_after(collection: Collection, id: i64) -> Result<i64> {
    id.checked_add(1).ok_or_else(|| {
        FuelTrackerError::Storage(format!("{collection} id {id} leaves no room for further records"))
    })
}

impl Snapshot {
    /// A database that has never been opened (version 0, nothing created).
    #[must_use]
    pub fn uninitialized() -> Self {
        Self {
            version: 0,
            next_ids: NextIds::default(),
            cars: BTreeMap::new(),
            fuel: BTreeMap::new(),
        }
    }
}

/// Brings a snapshot up to [`SCHEMA_VERSION`].
///
/// Runs once per open when the stored version differs from the expected one.
/// Running it on an up-to-date snapshot is a no-op. There is no downgrade path.
///
/// # Errors
///
/// Returns [`FuelTrackerError::Storage`] when the snapshot was written by a
/// newer schema.
pub fn upgrade(snapshot: &mut Snapshot) -> Result<()> {
    if snapshot.version > SCHEMA_VERSION {
        return Err(FuelTrackerError::Storage(format!(
            "database schema version {} is newer than supported version {SCHEMA_VERSION}",
            snapshot.version
        )));
    }

    if snapshot.version == 0 {
        tracing::debug!("creating cars and fuel collections");
        snapshot.cars.clear();
        snapshot.fuel.clear();
        snapshot.next_ids = NextIds::default();
    }

    snapshot.version = SCHEMA_VERSION;
    Ok(())
}

/// Live collections plus the secondary index.
#[derive(Debug, Clone)]
pub struct Tables {
    snapshot: Snapshot,
    fuel_by_car: BTreeMap<i64, BTreeSet<i64>>,
}

impl Tables {
    /// Opens tables from a snapshot, upgrading it and rebuilding the index.
    ///
    /// # Errors
    ///
    /// Fails if the snapshot cannot be upgraded, or if a stored id is so
    /// large that no further id could be assigned.
    pub fn open(mut snapshot: Snapshot) -> Result<Self> {
        if snapshot.version != SCHEMA_VERSION {
            tracing::debug!(from = snapshot.version, to = SCHEMA_VERSION, "upgrading database schema");
            upgrade(&mut snapshot)?;
        }

        // Counters must stay ahead of every stored key, even in hand-edited files.
        let max_car = snapshot.cars.keys().next_back().copied().unwrap_or(0);
        let max_fuel = snapshot.fuel.keys().next_back().copied().unwrap_or(0);
        snapshot.next_ids.cars = snapshot.next_ids.cars.max(id_after(Collection::Cars, max_car)?);
        snapshot.next_ids.fuel = snapshot.next_ids.fuel.max(id_after(Collection::Fuel, max_fuel)?);

        let mut tables = Self {
            snapshot,
            fuel_by_car: BTreeMap::new(),
        };
        tables.rebuild_index();
        Ok(tables)
    }

    /// Empty tables at the current schema version.
    #[must_use]
    pub fn fresh() -> Self {
        let mut snapshot = Snapshot::uninitialized();
        snapshot.version = SCHEMA_VERSION;
        Self {
            snapshot,
            fuel_by_car: BTreeMap::new(),
        }
    }

    fn rebuild_index(&mut self) {
        self.fuel_by_car.clear();
        for (id, record) in &mut self.snapshot.fuel {
            record.id = Some(*id);
            self.fuel_by_car.entry(record.car).or_default().insert(*id);
        }
        for (id, record) in &mut self.snapshot.cars {
            record.id = Some(*id);
        }
    }

    /// The serializable state.
    #[must_use]
    pub const fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Inserts or replaces a car, returning its id.
    ///
    /// # Errors
    ///
    /// Fails without changing anything when the id space is exhausted.
    pub fn put_car(&mut self, record: &CarRecord) -> Result<i64> {
        let id = record.id.unwrap_or(self.snapshot.next_ids.cars);
        let next = id_after(Collection::Cars, id)?;
        self.snapshot.next_ids.cars = self.snapshot.next_ids.cars.max(next);

        let mut stored = record.clone();
        stored.id = Some(id);
        self.snapshot.cars.insert(id, stored);
        Ok(id)
    }

    #[must_use]
    pub fn get_car(&self, id: i64) -> Option<CarRecord> {
        self.snapshot.cars.get(&id).cloned()
    }

    pub fn delete_car(&mut self, id: i64) -> bool {
        self.snapshot.cars.remove(&id).is_some()
    }

    #[must_use]
    pub fn cars(&self) -> Vec<CarRecord> {
        self.snapshot.cars.values().cloned().collect()
    }

    /// Inserts or replaces a fill-up and keeps the `car` index in step.
    ///
    /// # Errors
    ///
    /// Fails without changing anything when the id space is exhausted.
    pub fn put_fuel(&mut self, record: &FuelRecord) -> Result<i64> {
        let id = record.id.unwrap_or(self.snapshot.next_ids.fuel);
        let next = id_after(Collection::Fuel, id)?;
        self.snapshot.next_ids.fuel = self.snapshot.next_ids.fuel.max(next);

        if let Some(previous) = self.snapshot.fuel.get(&id) {
            if previous.car != record.car {
                self.unindex(previous.car, id);
            }
        }

        let mut stored = record.clone();
        stored.id = Some(id);
        self.fuel_by_car.entry(stored.car).or_default().insert(id);
        self.snapshot.fuel.insert(id, stored);
        Ok(id)
    }

    #[must_use]
    pub fn get_fuel(&self, id: i64) -> Option<FuelRecord> {
        self.snapshot.fuel.get(&id).cloned()
    }

    pub fn delete_fuel(&mut self, id: i64) -> bool {
        match self.snapshot.fuel.remove(&id) {
            Some(record) => {
                self.unindex(record.car, id);
                true
            }
            None => false,
        }
    }

    /// Fill-ups of one car, looked up through the `car` index.
    #[must_use]
    pub fn fuel_for_car(&self, car_id: i64) -> Vec<FuelRecord> {
        self.fuel_by_car
            .get(&car_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.snapshot.fuel.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Applies every operation of `batch` in order.
    ///
    /// Returns the ids touched by each operation, in batch order.
    ///
    /// # Errors
    ///
    /// If any operation fails the tables are left exactly as they were.
    pub fn apply(&mut self, batch: &WriteBatch) -> Result<Vec<i64>> {
        let mut staged = self.clone();
        let ids = batch
            .ops()
            .iter()
            .map(|op| match op {
                WriteOp::PutCar(record) => staged.put_car(record),
                WriteOp::PutFuel(record) => staged.put_fuel(record),
                WriteOp::DeleteCar(id) => {
                    staged.delete_car(*id);
                    Ok(*id)
                }
                WriteOp::DeleteFuel(id) => {
                    staged.delete_fuel(*id);
                    Ok(*id)
                }
            })
            .collect::<Result<Vec<_>>>()?;
        *self = staged;
        Ok(ids)
    }

    fn unindex(&mut self, car_id: i64, fuel_id: i64) {
        if let Some(ids) = self.fuel_by_car.get_mut(&car_id) {
            ids.remove(&fuel_id);
            if ids.is_empty() {
                self.fuel_by_car.remove(&car_id);
            }
        }
    }
}
