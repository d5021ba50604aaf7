//! Fuel repository.

use crate::domain::error::{Collection, FuelTrackerError, Result};
use crate::domain::{FillUp, FillUpDetails};
use crate::storage::{FuelRecord, Storage};

/// CRUD over the `fuel` collection, always scoped to an existing car.
pub struct FuelRepository<'s> {
    store: &'s mut dyn Storage,
}

impl<'s> FuelRepository<'s> {
    pub fn new(store: &'s mut dyn Storage) -> Self {
        Self { store }
    }

    fn require_car(&self, car_id: i64) -> Result<()> {
        match self.store.get_car(car_id)? {
            Some(_) => Ok(()),
            None => Err(FuelTrackerError::NotFound {
                collection: Collection::Cars,
                id: car_id,
            }),
        }
    }

    /// Validates and inserts a fill-up for `car_id`.
    ///
    /// # Errors
    ///
    /// [`FuelTrackerError::NotFound`] when the car does not exist,
    /// [`FuelTrackerError::Validation`] for bad fields.
    pub fn add(&mut self, car_id: i64, details: &FillUpDetails) -> Result<i64> {
        let _span = tracing::debug_span!("fuel_add", car_id = car_id).entered();
        self.require_car(car_id)?;
        details.validate()?;

        let id = self.store.put_fuel(&FuelRecord::from_details(None, car_id, details))?;
        tracing::info!(fuel_id = id, "fill-up added");
        Ok(id)
    }

    /// Replaces every field of an existing fill-up.
    ///
    /// # Errors
    ///
    /// [`FuelTrackerError::NotFound`] when either the fill-up or the car is
    /// unknown.
    pub fn update(&mut self, id: i64, car_id: i64, details: &FillUpDetails) -> Result<()> {
        let _span = tracing::debug_span!("fuel_update", fuel_id = id, car_id = car_id).entered();

        if self.store.get_fuel(id)?.is_none() {
            return Err(FuelTrackerError::NotFound {
                collection: Collection::Fuel,
                id,
            });
        }
        self.require_car(car_id)?;
        details.validate()?;

        self.store.put_fuel(&FuelRecord::from_details(Some(id), car_id, details))?;
        tracing::info!("fill-up updated");
        Ok(())
    }

    /// Removes a fill-up. Unknown ids are a no-op.
    ///
    /// # Errors
    ///
    /// Storage errors from the write.
    pub fn delete(&mut self, id: i64) -> Result<()> {
        let _span = tracing::debug_span!("fuel_delete", fuel_id = id).entered();
        self.store.delete_fuel(id)
    }

    /// Looks up one fill-up.
    ///
    /// # Errors
    ///
    /// Storage errors only; an unknown id is `Ok(None)`.
    pub fn get(&self, id: i64) -> Result<Option<FillUp>> {
        Ok(self.store.get_fuel(id)?.and_then(FuelRecord::into_fill_up))
    }

    /// Fill-ups of one car through the `car` index, in no particular order.
    ///
    /// # Errors
    ///
    /// Storage errors from the scan.
    pub fn list_for_car(&self, car_id: i64) -> Result<Vec<FillUp>> {
        let fill_ups: Vec<FillUp> = self
            .store
            .scan_fuel_by_car(car_id)?
            .into_iter()
            .filter_map(FuelRecord::into_fill_up)
            .collect();
        tracing::debug!(car_id = car_id, count = fill_ups.len(), "listed fill-ups");
        Ok(fill_ups)
    }
}
