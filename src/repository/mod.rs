//! Repositories over the record store.
//!
//! [`CarRepository`] and [`FuelRepository`] are the only mutation and query
//! surface the rest of the application uses. They validate input before it
//! reaches storage, translate between domain types and storage records, and
//! enforce referential integrity between cars and fill-ups.
//!
//! Both borrow the store for the duration of one logical operation; the worker
//! owns the store and builds a repository per request.

pub mod cars;
pub mod fuel;

pub use cars::CarRepository;
pub use fuel::FuelRepository;
