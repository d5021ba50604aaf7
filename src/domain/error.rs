//! Error types for the fuel tracker.
//!
//! This module defines the crate-wide error type [`FuelTrackerError`], the
//! [`ErrorKind`] classification used when errors cross the worker boundary, and
//! the [`Result`] alias used throughout the crate.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifies one of the two persisted collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    /// The `cars` collection.
    Cars,
    /// The `fuel` collection (fill-up records).
    Fuel,
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cars => f.write_str("cars"),
            Self::Fuel => f.write_str("fuel"),
        }
    }
}

/// The main error type for fuel tracker operations.
///
/// Validation problems are caught before anything reaches storage, lookups of
/// unknown ids surface as [`FuelTrackerError::NotFound`], and everything the
/// persistence layer reports ends up as [`FuelTrackerError::Storage`] or
/// [`FuelTrackerError::Io`].
///
/// # Examples
///
/// ```
/// use fuel_tracker::domain::{Collection, ErrorKind, FuelTrackerError};
///
/// let err = FuelTrackerError::NotFound { collection: Collection::Cars, id: 7 };
/// assert_eq!(err.kind(), ErrorKind::NotFound);
/// assert_eq!(err.to_string(), "no record 7 in cars");
/// ```
#[derive(Debug, Error)]
pub enum FuelTrackerError {
    /// Input fields are missing or malformed.
    #[error("{0}")]
    Validation(String),

    /// An operation referenced an id that does not exist.
    #[error("no record {id} in {collection}")]
    NotFound {
        /// Collection that was searched.
        collection: Collection,
        /// The id that was not found.
        id: i64,
    },

    /// The storage backend failed to read or commit a transaction.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or unreadable.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The worker could not service a request.
    #[error("Worker error: {0}")]
    Worker(String),
}

impl FuelTrackerError {
    /// Shorthand for building a [`FuelTrackerError::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Classifies the error for surfacing to the user.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Storage(_) | Self::Io(_) | Self::Config(_) | Self::Worker(_) => ErrorKind::Storage,
        }
    }
}

/// Coarse error classification shipped across the worker boundary.
///
/// Determines how the application layer surfaces a failure: validation
/// messages are shown as-is, missing records become a generic failure, and
/// storage failures are shown verbatim with a retry option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Malformed or missing input.
    Validation,
    /// Stale id.
    NotFound,
    /// Storage I/O or transaction failure.
    Storage,
}

/// A specialized `Result` type for fuel tracker operations.
pub type Result<T> = std::result::Result<T, FuelTrackerError>;
