//! Tracing with OpenTelemetry span export to a local file.
//!
//! ```text
//! tracing macros → tracing-opentelemetry → opentelemetry_sdk → JsonLinesExporter → file
//! ```
//!
//! Spans are written to `<data_dir>/fuel-tracker-traces.jsonl`, one JSON
//! object per line. The file rotates at 10 MiB and three backups are kept
//! (`.1` newest).
//!
//! The level comes from `trace_level` in the config, default `"info"`, and
//! accepts any `EnvFilter` directive (`fuel_tracker::storage=debug`).
//!
//! # Modules
//!
//! - [`init`]: subscriber installation
//! - `tracer`: tracer provider and exporter
//! - `span_formatter`: span to JSON record
//! - `file_writer`: rotating line writer

mod file_writer;
pub mod init;
mod span_formatter;
mod tracer;

pub use init::{init_tracing, SERVICE_NAME};
