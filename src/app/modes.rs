//! Editor mode and field identifiers.

/// Whether an editor creates a record or changes an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Add,
    /// Editing the record with this id.
    Edit(i64),
}

impl EditMode {
    #[must_use]
    pub const fn id(self) -> Option<i64> {
        match self {
            Self::Add => None,
            Self::Edit(id) => Some(id),
        }
    }

    #[must_use]
    pub const fn is_add(self) -> bool {
        matches!(self, Self::Add)
    }
}

/// Text inputs of the car editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarField {
    Year,
    Make,
    Model,
    PurchaseDate,
    PurchaseMileage,
}

/// Text inputs of the fuel editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuelField {
    Date,
    Mileage,
    Price,
    Quantity,
    Total,
}

/// Checkbox inputs of the fuel editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuelFlag {
    Partial,
    Missed,
}
