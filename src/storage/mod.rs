//! Record store for cars and fill-ups.
//!
//! Two keyed collections, `cars` and `fuel`, with a secondary index from
//! fill-ups to their car. Ids are assigned by the store.
//!
//! # Modules
//!
//! - `backend`: the [`Storage`] trait every backend implements
//! - `json`: JSON file backend with atomic writes (default)
//! - `memory`: in-memory backend
//! - `models`: on-disk record types and write batches
//! - `tables`: collection semantics and schema upgrade shared by the backends

pub mod backend;
pub mod json;
pub mod memory;
pub mod models;
pub mod tables;

pub use backend::Storage;
pub use json::JsonStore;
pub use memory::MemoryStore;
pub use models::{CarRecord, FuelRecord, WriteBatch, WriteOp};
pub use tables::SCHEMA_VERSION;
