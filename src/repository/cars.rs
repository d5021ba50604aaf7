//! Car repository.

use crate::domain::error::{Collection, FuelTrackerError, Result};
use crate::domain::{Car, CarDetails};
use crate::repository::fuel::FuelRepository;
use crate::storage::{CarRecord, Storage, WriteBatch, WriteOp};

/// CRUD over the `cars` collection, cascading deletes into `fuel`.
pub struct CarRepository<'s> {
    store: &'s mut dyn Storage,
}

impl<'s> CarRepository<'s> {
    pub fn new(store: &'s mut dyn Storage) -> Self {
        Self { store }
    }

    /// Validates and inserts a new car, returning its assigned id.
    ///
    /// # Errors
    ///
    /// [`FuelTrackerError::Validation`] for bad fields, storage errors otherwise.
    pub fn add(&mut self, details: &CarDetails) -> Result<i64> {
        let _span = tracing::debug_span!("car_add", make = %details.make, model = %details.model).entered();
        details.validate()?;

        let id = self.store.put_car(&CarRecord::from_details(None, details))?;
        tracing::info!(car_id = id, "car added");
        Ok(id)
    }

    /// Replaces every field of an existing car.
    ///
    /// # Errors
    ///
    /// [`FuelTrackerError::NotFound`] when `id` is unknown.
    pub fn update(&mut self, id: i64, details: &CarDetails) -> Result<()> {
        let _span = tracing::debug_span!("car_update", car_id = id).entered();
        details.validate()?;

        if self.store.get_car(id)?.is_none() {
            return Err(FuelTrackerError::NotFound {
                collection: Collection::Cars,
                id,
            });
        }

        self.store.put_car(&CarRecord::from_details(Some(id), details))?;
        tracing::info!("car updated");
        Ok(())
    }

    /// Deletes a car together with all of its fill-ups.
    ///
    /// The fill-ups are enumerated through the fuel repository and removed in
    /// the same atomic batch as the car, children first. When the commit fails
    /// nothing is removed. Deleting an unknown id is a no-op.
    ///
    /// Returns the number of fill-ups removed with the car.
    ///
    /// # Errors
    ///
    /// Storage errors from enumerating or committing.
    pub fn delete(&mut self, id: i64) -> Result<usize> {
        let _span = tracing::debug_span!("car_delete", car_id = id).entered();

        if self.store.get_car(id)?.is_none() {
            tracing::debug!("car absent, nothing to delete");
            return Ok(0);
        }

        let children = FuelRepository::new(&mut *self.store).list_for_car(id)?;

        let mut batch = WriteBatch::new();
        for fill_up in &children {
            batch.push(WriteOp::DeleteFuel(fill_up.id));
        }
        batch.push(WriteOp::DeleteCar(id));

        if let Err(e) = self.store.commit(&batch) {
            tracing::error!(error = %e, fill_ups = children.len(), "cascading delete failed, car and fill-ups kept");
            return Err(e);
        }

        tracing::info!(fill_ups = children.len(), "car deleted");
        Ok(children.len())
    }

    /// Looks up one car.
    ///
    /// # Errors
    ///
    /// Storage errors only; an unknown id is `Ok(None)`.
    pub fn get(&self, id: i64) -> Result<Option<Car>> {
        Ok(self.store.get_car(id)?.and_then(CarRecord::into_car))
    }

    /// Every car, in no particular order.
    ///
    /// # Errors
    ///
    /// Storage errors from the scan.
    pub fn list(&self) -> Result<Vec<Car>> {
        let cars: Vec<Car> = self
            .store
            .scan_cars()?
            .into_iter()
            .filter_map(CarRecord::into_car)
            .collect();
        tracing::debug!(count = cars.len(), "listed cars");
        Ok(cars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FillUpDetails;
    use crate::storage::{FuelRecord, MemoryStore};

    fn civic() -> CarDetails {
        CarDetails {
            year: 2020,
            make: "Honda".to_string(),
            model: "Civic".to_string(),
            purchase_date: "2020-03-14".to_string(),
            purchase_mileage: 12,
        }
    }

    fn fill_up(mileage: i64) -> FillUpDetails {
        FillUpDetails {
            date: "2024-05-01".to_string(),
            mileage,
            price_per_unit: 3.459,
            quantity: 11.2,
            total: 38.74,
            partial: false,
            missed: false,
        }
    }

    /// Store whose batch commits always fail.
    struct FailingCommit(MemoryStore);

    impl Storage for FailingCommit {
        fn put_car(&mut self, record: &CarRecord) -> Result<i64> {
            self.0.put_car(record)
        }
        fn get_car(&self, id: i64) -> Result<Option<CarRecord>> {
            self.0.get_car(id)
        }
        fn delete_car(&mut self, id: i64) -> Result<()> {
            self.0.delete_car(id)
        }
        fn scan_cars(&self) -> Result<Vec<CarRecord>> {
            self.0.scan_cars()
        }
        fn put_fuel(&mut self, record: &FuelRecord) -> Result<i64> {
            self.0.put_fuel(record)
        }
        fn get_fuel(&self, id: i64) -> Result<Option<FuelRecord>> {
            self.0.get_fuel(id)
        }
        fn delete_fuel(&mut self, id: i64) -> Result<()> {
            self.0.delete_fuel(id)
        }
        fn scan_fuel_by_car(&self, car_id: i64) -> Result<Vec<FuelRecord>> {
            self.0.scan_fuel_by_car(car_id)
        }
        fn commit(&mut self, _batch: &WriteBatch) -> Result<Vec<i64>> {
            Err(FuelTrackerError::Storage("disk full".to_string()))
        }
        fn schema_version(&self) -> u32 {
            self.0.schema_version()
        }
    }

    #[test]
    fn added_car_is_listed_with_its_id() {
        let mut store = MemoryStore::new();
        let mut repo = CarRepository::new(&mut store);
        let id = repo.add(&civic()).unwrap();

        let cars = repo.list().unwrap();
        assert_eq!(cars, vec![Car { id, details: civic() }]);
    }

    #[test]
    fn invalid_car_never_reaches_storage() {
        let mut store = MemoryStore::new();
        let mut repo = CarRepository::new(&mut store);
        let mut details = civic();
        details.make = "  ".to_string();

        assert!(matches!(repo.add(&details), Err(FuelTrackerError::Validation(_))));
        assert!(repo.list().unwrap().is_empty());
    }

    #[test]
    fn update_unknown_car_is_not_found() {
        let mut store = MemoryStore::new();
        let err = CarRepository::new(&mut store).update(9, &civic()).unwrap_err();
        assert!(matches!(
            err,
            FuelTrackerError::NotFound {
                collection: Collection::Cars,
                id: 9
            }
        ));
    }

    #[test]
    fn update_replaces_all_fields() {
        let mut store = MemoryStore::new();
        let mut repo = CarRepository::new(&mut store);
        let id = repo.add(&civic()).unwrap();

        let mut changed = civic();
        changed.model = "Accord".to_string();
        changed.purchase_mileage = 40;
        repo.update(id, &changed).unwrap();

        assert_eq!(repo.get(id).unwrap().unwrap().details, changed);
    }

    #[test]
    fn delete_cascades_to_fill_ups() {
        let mut store = MemoryStore::new();
        let car_id = CarRepository::new(&mut store).add(&civic()).unwrap();
        let other = CarRepository::new(&mut store).add(&civic()).unwrap();
        {
            let mut fuel = FuelRepository::new(&mut store);
            fuel.add(car_id, &fill_up(100)).unwrap();
            fuel.add(car_id, &fill_up(200)).unwrap();
            fuel.add(other, &fill_up(300)).unwrap();
        }

        let removed = CarRepository::new(&mut store).delete(car_id).unwrap();
        assert_eq!(removed, 2);

        let fuel = FuelRepository::new(&mut store);
        assert!(fuel.list_for_car(car_id).unwrap().is_empty());
        assert_eq!(fuel.list_for_car(other).unwrap().len(), 1);
        let cars = CarRepository::new(&mut store).list().unwrap();
        assert_eq!(cars.len(), 1);
        assert_eq!(cars[0].id, other);
    }

    #[test]
    fn failed_cascade_keeps_car_and_children() {
        let mut store = FailingCommit(MemoryStore::new());
        let car_id = CarRepository::new(&mut store).add(&civic()).unwrap();
        FuelRepository::new(&mut store).add(car_id, &fill_up(100)).unwrap();

        let err = CarRepository::new(&mut store).delete(car_id).unwrap_err();
        assert!(matches!(err, FuelTrackerError::Storage(_)));

        assert!(CarRepository::new(&mut store).get(car_id).unwrap().is_some());
        assert_eq!(FuelRepository::new(&mut store).list_for_car(car_id).unwrap().len(), 1);
    }

    #[test]
    fn deleting_unknown_car_is_a_no_op() {
        let mut store = MemoryStore::new();
        assert_eq!(CarRepository::new(&mut store).delete(5).unwrap(), 0);
    }
}
