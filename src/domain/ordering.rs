//! Presentation order for car and fill-up lists.
//!
//! Stored collections have no inherent order. Every list shown to the user is
//! sorted at read time with the functions in this module:
//!
//! - **Cars**: newest model year first, then make and model (collated), then
//!   purchase date (oldest first). The id breaks any remaining tie so two
//!   identical cars still have a fixed order.
//! - **Fill-ups**: highest mileage first. Equal mileages keep their relative
//!   order from the underlying stable sort.

use super::car::Car;
use super::collation::collate;
use super::fill_up::FillUp;
use std::cmp::Ordering;

/// Compares two cars for the main list.
#[must_use]
pub fn compare_cars(a: &Car, b: &Car) -> Ordering {
    let (x, y) = (&a.details, &b.details);

    y.year
        .cmp(&x.year)
        .then_with(|| collate(&x.make, &y.make))
        .then_with(|| collate(&x.model, &y.model))
        .then_with(|| x.purchase_date.cmp(&y.purchase_date))
        .then_with(|| a.id.cmp(&b.id))
}

/// Sorts cars in place into main-list order.
///
/// # Examples
///
/// ```
/// use fuel_tracker::domain::{sort_cars, Car, CarDetails};
///
/// let car = |id, year, make: &str, model: &str| Car {
///     id,
///     details: CarDetails {
///         year,
///         make: make.to_string(),
///         model: model.to_string(),
///         purchase_date: "2024-01-01".to_string(),
///         purchase_mileage: 0,
///     },
/// };
///
/// let mut cars = vec![car(1, 2020, "Honda", "Civic"), car(2, 2022, "Toyota", "Camry")];
/// sort_cars(&mut cars);
/// assert_eq!(cars[0].details.model, "Camry");
/// ```
pub fn sort_cars(cars: &mut [Car]) {
    cars.sort_by(compare_cars);
}

/// Sorts fill-ups in place, highest mileage first.
pub fn sort_fill_ups(fill_ups: &mut [FillUp]) {
    fill_ups.sort_by(|a, b| b.details.mileage.cmp(&a.details.mileage));
}
