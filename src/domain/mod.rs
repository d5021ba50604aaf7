//! Domain layer for the fuel tracker.
//!
//! Entities, input validation, presentation order and the crate's error type,
//! independent of storage or UI concerns.
//!
//! # Organization
//!
//! - [`car`]: Car entity and its editable fields
//! - [`fill_up`]: Fill-up (fuel record) entity
//! - [`ordering`]: Sort order for car and fill-up lists
//! - [`collation`]: Locale-aware string comparison used by the car order
//! - [`error`]: Error types and result alias

pub mod car;
pub mod collation;
pub mod error;
pub mod fill_up;
pub mod ordering;

pub use car::{today, Car, CarDetails};
pub use error::{Collection, ErrorKind, FuelTrackerError, Result};
pub use fill_up::{FillUp, FillUpDetails};
pub use ordering::{compare_cars, sort_cars, sort_fill_ups};
