//! Fill-up (fuel record) domain model.

use super::car::validate_date;
use super::error::{FuelTrackerError, Result};
use serde::{Deserialize, Serialize};

/// User-editable fields of a fill-up.
///
/// `total` is normally `price_per_unit * quantity`, but it is stored as entered
/// and never recomputed here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillUpDetails {
    /// Date of the fill-up as `YYYY-MM-DD`.
    pub date: String,
    /// Odometer reading at the fill-up.
    pub mileage: i64,
    /// Price of one unit of fuel.
    pub price_per_unit: f64,
    /// Units of fuel bought.
    pub quantity: f64,
    /// Total cost.
    pub total: f64,
    /// The tank was not filled completely.
    pub partial: bool,
    /// A previous fill-up was not recorded.
    pub missed: bool,
}

impl FillUpDetails {
    /// Checks that every field is present and well-formed.
    ///
    /// # Errors
    ///
    /// Returns [`FuelTrackerError::Validation`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        validate_date("Date", &self.date)?;
        if self.mileage < 0 {
            return Err(FuelTrackerError::validation("Mileage must not be negative"));
        }
        validate_amount("Price", self.price_per_unit)?;
        validate_amount("Quantity", self.quantity)?;
        validate_amount("Total", self.total)
    }

    /// Whether this fill-up may be compared with the previous one when
    /// computing consumption rates.
    #[must_use]
    pub const fn counts_for_consumption(&self) -> bool {
        !self.partial && !self.missed
    }
}

fn validate_amount(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(FuelTrackerError::validation(format!("{field} must be a number")));
    }
    if value < 0.0 {
        return Err(FuelTrackerError::validation(format!("{field} must not be negative")));
    }
    Ok(())
}

/// A persisted fill-up, always owned by exactly one car.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillUp {
    /// Store-assigned id.
    pub id: i64,
    /// Id of the owning car.
    pub car_id: i64,
    /// The fill-up's fields.
    pub details: FillUpDetails,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_up() -> FillUpDetails {
        FillUpDetails {
            date: "2024-05-01".to_string(),
            mileage: 10_000,
            price_per_unit: 3.459,
            quantity: 11.2,
            total: 38.74,
            partial: false,
            missed: false,
        }
    }

    #[test]
    fn valid_fill_up_passes() {
        assert!(fill_up().validate().is_ok());
    }

    #[test]
    fn total_is_not_checked_against_price_times_quantity() {
        let details = FillUpDetails { total: 1.0, ..fill_up() };
        assert!(details.validate().is_ok());
    }

    #[test]
    fn nan_and_negative_amounts_are_rejected() {
        let details = FillUpDetails { price_per_unit: f64::NAN, ..fill_up() };
        assert_eq!(details.validate().unwrap_err().to_string(), "Price must be a number");

        let details = FillUpDetails { quantity: -0.5, ..fill_up() };
        assert_eq!(details.validate().unwrap_err().to_string(), "Quantity must not be negative");
    }

    #[test]
    fn partial_and_missed_are_excluded_from_consumption() {
        assert!(fill_up().counts_for_consumption());
        assert!(!FillUpDetails { partial: true, ..fill_up() }.counts_for_consumption());
        assert!(!FillUpDetails { missed: true, ..fill_up() }.counts_for_consumption());
    }
}
