//! Transient editor state for the car and fuel forms.
//!
//! Editors hold their inputs as strings, exactly as typed, plus a `modified`
//! flag. Nothing reaches the store until the draft is parsed into domain
//! details on save; cancelling simply drops the editor.

use super::modes::{CarField, EditMode, FuelField, FuelFlag};
use crate::domain::error::{FuelTrackerError, Result};
use crate::domain::{today, Car, CarDetails, FillUp, FillUpDetails};

fn parse_whole(field: &str, value: &str) -> Result<i64> {
    let value = value.trim();
    if value.is_empty() {
        return Err(FuelTrackerError::validation(format!("{field} is required")));
    }
    value
        .parse()
        .map_err(|_| FuelTrackerError::validation(format!("{field} must be a whole number")))
}

fn parse_amount(field: &str, value: &str) -> Result<f64> {
    let value = value.trim();
    if value.is_empty() {
        return Err(FuelTrackerError::validation(format!("{field} is required")));
    }
    value
        .parse()
        .map_err(|_| FuelTrackerError::validation(format!("{field} must be a number")))
}

/// Draft of the car add/edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarEditor {
    pub mode: EditMode,
    pub year: String,
    pub make: String,
    pub model: String,
    pub purchase_date: String,
    pub purchase_mileage: String,
    pub modified: bool,
}

impl CarEditor {
    /// Empty form; the purchase date defaults to today.
    #[must_use]
    pub fn add() -> Self {
        Self {
            mode: EditMode::Add,
            year: String::new(),
            make: String::new(),
            model: String::new(),
            purchase_date: today(),
            purchase_mileage: String::new(),
            modified: false,
        }
    }

    /// Form prefilled from a stored car.
    #[must_use]
    pub fn edit(car: &Car) -> Self {
        Self {
            mode: EditMode::Edit(car.id),
            year: car.details.year.to_string(),
            make: car.details.make.clone(),
            model: car.details.model.clone(),
            purchase_date: car.details.purchase_date.clone(),
            purchase_mileage: car.details.purchase_mileage.to_string(),
            modified: false,
        }
    }

    #[must_use]
    pub const fn title(&self) -> &'static str {
        if self.mode.is_add() {
            "Add Car"
        } else {
            "Edit Car"
        }
    }

    pub fn set(&mut self, field: CarField, value: &str) {
        let slot = match field {
            CarField::Year => &mut self.year,
            CarField::Make => &mut self.make,
            CarField::Model => &mut self.model,
            CarField::PurchaseDate => &mut self.purchase_date,
            CarField::PurchaseMileage => &mut self.purchase_mileage,
        };
        value.clone_into(slot);
        self.modified = true;
    }

    /// Parses the draft into validated car details.
    ///
    /// # Errors
    ///
    /// [`FuelTrackerError::Validation`] naming the first bad input.
    pub fn to_details(&self) -> Result<CarDetails> {
        let year = parse_whole("Year", &self.year)?;
        let year = i32::try_from(year).map_err(|_| FuelTrackerError::validation("Year is out of range"))?;
        let details = CarDetails {
            year,
            make: self.make.trim().to_string(),
            model: self.model.trim().to_string(),
            purchase_date: self.purchase_date.trim().to_string(),
            purchase_mileage: parse_whole("Purchase mileage", &self.purchase_mileage)?,
        };
        details.validate()?;
        Ok(details)
    }
}

/// Draft of the fuel add/edit form, always bound to one car.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuelEditor {
    pub mode: EditMode,
    pub car_id: i64,
    pub date: String,
    pub mileage: String,
    pub price: String,
    pub quantity: String,
    pub total: String,
    pub partial: bool,
    pub missed: bool,
    pub modified: bool,
}

impl FuelEditor {
    /// Empty form for `car_id`; the date defaults to today.
    #[must_use]
    pub fn add(car_id: i64) -> Self {
        Self {
            mode: EditMode::Add,
            car_id,
            date: today(),
            mileage: String::new(),
            price: String::new(),
            quantity: String::new(),
            total: String::new(),
            partial: false,
            missed: false,
            modified: false,
        }
    }

    /// Form prefilled from a stored fill-up. Price and quantity show three
    /// decimals, the total two.
    #[must_use]
    pub fn edit(fill_up: &FillUp) -> Self {
        let d = &fill_up.details;
        Self {
            mode: EditMode::Edit(fill_up.id),
            car_id: fill_up.car_id,
            date: d.date.clone(),
            mileage: d.mileage.to_string(),
            price: format!("{:.3}", d.price_per_unit),
            quantity: format!("{:.3}", d.quantity),
            total: format!("{:.2}", d.total),
            partial: d.partial,
            missed: d.missed,
            modified: false,
        }
    }

    #[must_use]
    pub const fn title(&self) -> &'static str {
        if self.mode.is_add() {
            "Add Fuel"
        } else {
            "Edit Fuel"
        }
    }

    /// A new fill-up cannot be deleted.
    #[must_use]
    pub const fn can_delete(&self) -> bool {
        !self.mode.is_add()
    }

    /// Updates one input. Changing price or quantity recomputes the total when
    /// both are numbers.
    pub fn set(&mut self, field: FuelField, value: &str) {
        let slot = match field {
            FuelField::Date => &mut self.date,
            FuelField::Mileage => &mut self.mileage,
            FuelField::Price => &mut self.price,
            FuelField::Quantity => &mut self.quantity,
            FuelField::Total => &mut self.total,
        };
        value.clone_into(slot);
        self.modified = true;

        if matches!(field, FuelField::Price | FuelField::Quantity) {
            self.recompute_total();
        }
    }

    pub fn toggle(&mut self, flag: FuelFlag) {
        match flag {
            FuelFlag::Partial => self.partial = !self.partial,
            FuelFlag::Missed => self.missed = !self.missed,
        }
        self.modified = true;
    }

    fn recompute_total(&mut self) {
        let price = self.price.trim().parse::<f64>();
        let quantity = self.quantity.trim().parse::<f64>();
        if let (Ok(price), Ok(quantity)) = (price, quantity) {
            self.total = format!("{:.2}", price * quantity);
        }
    }

    /// Parses the draft into validated fill-up details.
    ///
    /// # Errors
    ///
    /// [`FuelTrackerError::Validation`] naming the first bad input.
    pub fn to_details(&self) -> Result<FillUpDetails> {
        let details = FillUpDetails {
            date: self.date.trim().to_string(),
            mileage: parse_whole("Mileage", &self.mileage)?,
            price_per_unit: parse_amount("Price", &self.price)?,
            quantity: parse_amount("Quantity", &self.quantity)?,
            total: parse_amount("Total", &self.total)?,
            partial: self.partial,
            missed: self.missed,
        };
        details.validate()?;
        Ok(details)
    }
}
