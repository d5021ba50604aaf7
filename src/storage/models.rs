//! Storage record models for the persistence layer.
//!
//! These are the on-disk shapes of the two collections. They are kept apart
//! from the domain types so the file format (field names, optional ids) can
//! stay stable while the domain model evolves.

use crate::domain::{Car, CarDetails, FillUp, FillUpDetails};
use serde::{Deserialize, Serialize};

/// A row in the `cars` collection.
///
/// `id` is `None` for a record that has not been stored yet; `put` assigns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarRecord {
    /// Store-assigned key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Model year.
    pub year: i32,
    /// Manufacturer.
    pub make: String,
    /// Model name.
    pub model: String,
    /// Purchase date (`YYYY-MM-DD`).
    pub purchase: String,
    /// Odometer reading at purchase.
    pub mileage: i64,
}

impl CarRecord {
    /// Builds a record from domain fields, keyed by `id` when replacing.
    #[must_use]
    pub fn from_details(id: Option<i64>, details: &CarDetails) -> Self {
        Self {
            id,
            year: details.year,
            make: details.make.clone(),
            model: details.model.clone(),
            purchase: details.purchase_date.clone(),
            mileage: details.purchase_mileage,
        }
    }

    /// Converts a stored record into a domain [`Car`].
    ///
    /// Returns `None` for a record that was never assigned an id.
    #[must_use]
    pub fn into_car(self) -> Option<Car> {
        Some(Car {
            id: self.id?,
            details: CarDetails {
                year: self.year,
                make: self.make,
                model: self.model,
                purchase_date: self.purchase,
                purchase_mileage: self.mileage,
            },
        })
    }
}

/// A row in the `fuel` collection, indexed by `car`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelRecord {
    /// Store-assigned key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Id of the owning car; the secondary index key.
    pub car: i64,
    /// Fill-up date (`YYYY-MM-DD`).
    pub date: String,
    /// Odometer reading.
    pub mileage: i64,
    /// Price per unit.
    pub price: f64,
    /// Units bought.
    pub quantity: f64,
    /// Total cost.
    pub total: f64,
    /// Partial fill-up.
    #[serde(default)]
    pub partial: bool,
    /// Missed fill-up.
    #[serde(default)]
    pub missed: bool,
}

impl FuelRecord {
    /// Builds a record from domain fields.
    #[must_use]
    pub fn from_details(id: Option<i64>, car_id: i64, details: &FillUpDetails) -> Self {
        Self {
            id,
            car: car_id,
            date: details.date.clone(),
            mileage: details.mileage,
            price: details.price_per_unit,
            quantity: details.quantity,
            total: details.total,
            partial: details.partial,
            missed: details.missed,
        }
    }

    /// Converts a stored record into a domain [`FillUp`].
    #[must_use]
    pub fn into_fill_up(self) -> Option<FillUp> {
        Some(FillUp {
            id: self.id?,
            car_id: self.car,
            details: FillUpDetails {
                date: self.date,
                mileage: self.mileage,
                price_per_unit: self.price,
                quantity: self.quantity,
                total: self.total,
                partial: self.partial,
                missed: self.missed,
            },
        })
    }
}

/// One write inside an atomic [`WriteBatch`].
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Insert or replace a car.
    PutCar(CarRecord),
    /// Insert or replace a fill-up.
    PutFuel(FuelRecord),
    /// Remove a car; absent ids are ignored.
    DeleteCar(i64),
    /// Remove a fill-up; absent ids are ignored.
    DeleteFuel(i64),
}

/// An ordered list of writes committed as a single transaction.
///
/// Either every operation lands or none does. Operations apply in insertion
/// order, so a cascade lists children before their parent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    /// Creates an empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an operation.
    pub fn push(&mut self, op: WriteOp) -> &mut Self {
        self.ops.push(op);
        self
    }

    /// The queued operations in commit order.
    #[must_use]
    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    /// Number of queued operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether the batch has no operations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}
