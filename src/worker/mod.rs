//! Worker for record store operations.
//!
//! The application never touches storage directly. It posts a
//! [`WorkerMessage`] and receives a [`WorkerResponse`], which the runtime feeds
//! back into the event loop. Messages carry a tracing context so worker spans
//! link to the UI span that caused them.
//!
//! # Architecture
//!
//! - `messages`: Request/response protocol types with trace context propagation
//! - `handler`: Worker implementation and message processing logic

pub mod handler;
pub mod messages;

pub use handler::FuelTrackerWorker;
pub use messages::{TraceContext, WorkerMessage, WorkerResponse};
