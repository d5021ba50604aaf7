//! Fuel Tracker: personal vehicle fuel records with a local record store.
//!
//! The crate provides:
//! - A versioned record store with car and fuel collections, auto-assigned ids
//!   and a secondary index from cars to their fill-ups
//! - Car and fuel repositories with validation and a cascading, atomic car delete
//! - Deterministic list ordering (cars by year, make, model; fill-ups by mileage)
//! - A panel navigation controller with single-flight transitions and a modal
//!   dialog stack
//! - A console runtime driving the whole flow through a message-based worker

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Console runtime (main.rs)                          │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling, dialogs, editors                 │
//! │  - Panel navigation                                 │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Worker Layer  │   │ Repositories  │
//! │ (ui/)         │   │ (worker/)     │   │ (repository/) │
//! │ - View model  │   │ - Messages    │   │ - Validation  │
//! │ - Text render │   │ - Re-sorting  │   │ - Cascade     │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                                                  │
//! ┌─────────────────────────────────────────────────────┐
//! │  Storage Layer (storage/)                           │
//! │  - JSON snapshot file, in-memory backend            │
//! │  - Schema versioning, car → fuel index              │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain & Infrastructure                            │
//! │  - Car, FillUp, errors, ordering (domain/)          │
//! │  - Platform paths (infrastructure/)                 │
//! │  - OpenTelemetry span export (observability/)       │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Application state machine with event/action model
//! - [`domain`]: Records, validation errors and list ordering
//! - [`infrastructure`]: Platform-specific paths
//! - [`repository`]: Car and fuel repositories
//! - [`storage`]: Record store backends
//! - [`worker`]: Message-driven repository worker
//! - [`ui`]: View models and text rendering
//! - [`observability`]: Tracing and span export
//!
//! # Configuration
//!
//! Read from `<config_dir>/fuel-tracker/config.toml` when present:
//!
//! ```toml
//! data_dir = "~/fuel"
//! backend = "json"        # or "memory"
//! reduced_motion = false
//! trace_level = "info"
//! ```
//!
//! The same keys may be given as `key=value` arguments to the binary and
//! override the file.
//!
//! # Example
//!
//! ```rust
//! use fuel_tracker::app::CarField;
//! use fuel_tracker::worker::FuelTrackerWorker;
//! use fuel_tracker::{handle_event, initialize, Action, Config, Event, StorageBackend};
//!
//! let config = Config {
//!     backend: StorageBackend::Memory,
//!     reduced_motion: true,
//!     ..Default::default()
//! };
//! let mut state = initialize(&config);
//! let mut worker = FuelTrackerWorker::new(config);
//!
//! let mut queue = vec![
//!     Event::AddCar,
//!     Event::SetCarField(CarField::Year, "2019".into()),
//!     Event::SetCarField(CarField::Make, "Honda".into()),
//!     Event::SetCarField(CarField::Model, "Fit".into()),
//!     Event::SetCarField(CarField::PurchaseMileage, "120".into()),
//!     Event::Save,
//! ];
//! queue.reverse();
//!
//! while let Some(event) = queue.pop() {
//!     let (_render, actions) = handle_event(&mut state, &event)?;
//!     for action in actions {
//!         if let Action::PostToWorker(message) = action {
//!             queue.push(Event::WorkerResponse(worker.handle_message(message)));
//!         }
//!     }
//! }
//!
//! assert_eq!(state.cars.len(), 1);
//! # Ok::<(), fuel_tracker::FuelTrackerError>(())
//! ```

pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod observability;
pub mod repository;
pub mod storage;
pub mod ui;
pub mod worker;

pub use app::{handle_event, Action, AppState, Event};
pub use domain::{FuelTrackerError, Result};

use infrastructure::{data_dir, expand_tilde};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Which record store backend the worker opens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Snapshot file in the data directory.
    #[default]
    Json,
    /// Ephemeral, lost on exit.
    Memory,
}

impl StorageBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "memory" => Some(Self::Memory),
            _ => None,
        }
    }
}

/// Runtime configuration.
///
/// # Example
///
/// ```rust
/// use std::collections::BTreeMap;
/// use fuel_tracker::{Config, StorageBackend};
///
/// let mut map = BTreeMap::new();
/// map.insert("backend".to_string(), "memory".to_string());
/// map.insert("reduced_motion".to_string(), "1".to_string());
///
/// let config = Config::from_map(&map);
/// assert_eq!(config.backend, StorageBackend::Memory);
/// assert!(config.reduced_motion);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Directory holding the store and trace files. `~` is expanded.
    ///
    /// Default: `fuel-tracker` under the platform local data directory.
    pub data_dir: Option<PathBuf>,

    /// Record store backend. Default: [`StorageBackend::Json`]
    pub backend: StorageBackend,

    /// Complete panel transitions immediately instead of waiting for the
    /// runtime to report their end.
    pub reduced_motion: bool,

    /// Tracing filter directive.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`. Default: `"info"`
    pub trace_level: Option<String>,
}

impl Config {
    /// Builds a configuration from string key/value pairs.
    ///
    /// Recognized keys: `data_dir`, `backend` (`json` | `memory`),
    /// `reduced_motion` (`true`/`false`/`1`/`0`), `trace_level`. Unknown keys
    /// are ignored and unparsable values keep their defaults.
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let mut config = Self::default();
        config.apply_map(map);
        config
    }

    /// Overrides the fields named in `map`, leaving the others untouched.
    pub fn apply_map(&mut self, map: &BTreeMap<String, String>) {
        if let Some(dir) = map.get("data_dir").map(|s| s.trim()).filter(|s| !s.is_empty()) {
            self.data_dir = Some(PathBuf::from(dir));
        }

        if let Some(value) = map.get("backend") {
            match StorageBackend::parse(value) {
                Some(backend) => self.backend = backend,
                None => tracing::warn!(backend = %value, "unknown storage backend, keeping default"),
            }
        }

        if let Some(value) = map.get("reduced_motion") {
            match parse_bool(value) {
                Some(flag) => self.reduced_motion = flag,
                None => tracing::warn!(reduced_motion = %value, "invalid boolean, keeping default"),
            }
        }

        if let Some(level) = map.get("trace_level").map(|s| s.trim()).filter(|s| !s.is_empty()) {
            self.trace_level = Some(level.to_string());
        }
    }

    /// Parses the TOML configuration format.
    ///
    /// # Errors
    ///
    /// Returns `FuelTrackerError::Config` if the text is not valid TOML.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let table: toml::Table =
            toml::from_str(text).map_err(|e| FuelTrackerError::Config(e.to_string()))?;

        let map: BTreeMap<String, String> = table
            .into_iter()
            .filter_map(|(key, value)| {
                let value = match value {
                    toml::Value::String(s) => s,
                    toml::Value::Boolean(b) => b.to_string(),
                    toml::Value::Integer(i) => i.to_string(),
                    other => {
                        tracing::warn!(key = %key, value = %other, "unsupported config value");
                        return None;
                    }
                };
                Some((key, value))
            })
            .collect();

        Ok(Self::from_map(&map))
    }

    /// Reads and parses a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be read, or
    /// `FuelTrackerError::Config` if it is not valid TOML.
    pub fn load_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text).map_err(|e| match e {
            FuelTrackerError::Config(msg) => {
                FuelTrackerError::Config(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    /// Data directory with `~` expanded, or the platform default.
    #[must_use]
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir
            .as_ref()
            .map_or_else(data_dir, |dir| expand_tilde(&dir.to_string_lossy()))
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Creates the application state for a configuration.
///
/// The main panel is on the stack and the car list is empty until the
/// runtime posts [`AppState::load_cars`] and feeds the response
/// back.
///
/// ```rust
/// use fuel_tracker::app::PanelKind;
/// use fuel_tracker::{initialize, Config};
///
/// let state = initialize(&Config::default());
/// assert_eq!(state.top_panel(), PanelKind::Main);
/// ```
#[must_use]
pub fn initialize(config: &Config) -> AppState {
    tracing::debug!(
        backend = ?config.backend,
        reduced_motion = config.reduced_motion,
        "initializing fuel tracker"
    );
    AppState::new(config.reduced_motion)
}
