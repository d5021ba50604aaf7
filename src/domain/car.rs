//! Car domain model and validation.
//!
//! A car is identified by a store-assigned id and carries its model year, make,
//! model, purchase date and the odometer reading at purchase.

use super::error::{FuelTrackerError, Result};
use serde::{Deserialize, Serialize};

/// Date format used for every stored date (`YYYY-MM-DD`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// User-editable fields of a car.
///
/// This is what callers hand to [`crate::repository::CarRepository`]; the id
/// is never part of it because ids are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarDetails {
    /// Model year.
    pub year: i32,
    /// Manufacturer.
    pub make: String,
    /// Model name.
    pub model: String,
    /// Purchase date as `YYYY-MM-DD`.
    pub purchase_date: String,
    /// Odometer reading at purchase.
    pub purchase_mileage: i64,
}

impl CarDetails {
    /// Checks that every field is present and well-formed.
    ///
    /// # Errors
    ///
    /// Returns [`FuelTrackerError::Validation`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.make.trim().is_empty() {
            return Err(FuelTrackerError::validation("Make is required"));
        }
        if self.model.trim().is_empty() {
            return Err(FuelTrackerError::validation("Model is required"));
        }
        validate_date("Purchase date", &self.purchase_date)?;
        if self.purchase_mileage < 0 {
            return Err(FuelTrackerError::validation("Purchase mileage must not be negative"));
        }
        Ok(())
    }

    /// Display label used for titles and confirmation prompts.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} {} {}", self.year, self.make, self.model)
    }
}

/// A persisted car.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Car {
    /// Store-assigned id, immutable once assigned.
    pub id: i64,
    /// The car's fields.
    pub details: CarDetails,
}

/// Checks that `value` is a non-empty `YYYY-MM-DD` calendar date.
///
/// # Errors
///
/// Returns [`FuelTrackerError::Validation`] mentioning `field`.
pub fn validate_date(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(FuelTrackerError::validation(format!("{field} is required")));
    }
    chrono::NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map(|_| ())
        .map_err(|_| FuelTrackerError::validation(format!("{field} must be a date (YYYY-MM-DD)")))
}

/// Today's local date formatted as `YYYY-MM-DD`, the default for new records.
#[must_use]
pub fn today() -> String {
    chrono::Local::now().date_naive().format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn civic() -> CarDetails {
        CarDetails {
            year: 2020,
            make: "Honda".to_string(),
            model: "Civic".to_string(),
            purchase_date: "2020-03-14".to_string(),
            purchase_mileage: 12,
        }
    }

    #[test]
    fn valid_car_passes() {
        assert!(civic().validate().is_ok());
        assert_eq!(civic().label(), "2020 Honda Civic");
    }

    #[test]
    fn blank_make_is_rejected() {
        let car = CarDetails { make: "   ".to_string(), ..civic() };
        let err = car.validate().unwrap_err();
        assert_eq!(err.to_string(), "Make is required");
    }

    #[test]
    fn malformed_purchase_date_is_rejected() {
        let car = CarDetails { purchase_date: "14/03/2020".to_string(), ..civic() };
        assert!(matches!(car.validate(), Err(FuelTrackerError::Validation(_))));

        let car = CarDetails { purchase_date: "2021-02-30".to_string(), ..civic() };
        assert!(car.validate().is_err());
    }

    #[test]
    fn negative_mileage_is_rejected() {
        let car = CarDetails { purchase_mileage: -1, ..civic() };
        assert!(car.validate().is_err());
    }

    #[test]
    fn today_is_a_valid_date() {
        assert!(validate_date("Date", &today()).is_ok());
    }
}
