//! Worker implementation for record store operations.
//!
//! The worker owns the record store handle and services one [`WorkerMessage`]
//! at a time, so there is exactly one writer. Every mutation is followed by a
//! re-read of the affected collection, sorted into display order.

use crate::domain::error::{FuelTrackerError, Result};
use crate::domain::{sort_cars, sort_fill_ups, Car, CarDetails, ErrorKind, FillUp, FillUpDetails};
use crate::infrastructure::paths;
use crate::repository::{CarRepository, FuelRepository};
use crate::storage::{JsonStore, MemoryStore, Storage};
use crate::worker::{WorkerMessage, WorkerResponse};
use crate::{Config, StorageBackend};

/// Worker state for handling repository requests.
///
/// The storage backend is opened lazily on the first message, so a failed open
/// is reported as an ordinary error response and retried by the next request.
pub struct FuelTrackerWorker {
    config: Config,

    /// Storage backend, initialized lazily on first use.
    storage: Option<Box<dyn Storage>>,
}

impl FuelTrackerWorker {
    /// Creates a worker that opens its store from `config` on first use.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config, storage: None }
    }

    /// Creates a worker and opens its store immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend cannot be opened.
    pub fn open(config: Config) -> Result<Self> {
        let storage = Self::open_storage(&config)?;
        Ok(Self {
            config,
            storage: Some(storage),
        })
    }

    /// Creates a worker over an already opened store.
    #[must_use]
    pub fn with_storage(storage: Box<dyn Storage>) -> Self {
        Self {
            config: Config::default(),
            storage: Some(storage),
        }
    }

    fn open_storage(config: &Config) -> Result<Box<dyn Storage>> {
        let _span = tracing::debug_span!("open_storage", backend = ?config.backend).entered();
        let storage: Box<dyn Storage> = match config.backend {
            StorageBackend::Json => {
                let path = paths::store_file(&config.resolved_data_dir());
                Box::new(JsonStore::open(path)?)
            }
            StorageBackend::Memory => Box::new(MemoryStore::new()),
        };
        tracing::debug!(schema_version = storage.schema_version(), "storage opened");
        Ok(storage)
    }

    /// Returns the storage backend, opening it first if needed.
    fn get_storage(&mut self) -> Result<&mut dyn Storage> {
        if self.storage.is_none() {
            self.storage = Some(Self::open_storage(&self.config)?);
        }
        match self.storage {
            Some(ref mut storage) => Ok(storage.as_mut()),
            None => Err(FuelTrackerError::Worker("Storage not initialized".to_string())),
        }
    }

    fn sorted_cars(store: &mut dyn Storage) -> Result<Vec<Car>> {
        let mut cars = CarRepository::new(store).list()?;
        sort_cars(&mut cars);
        Ok(cars)
    }

    fn sorted_fill_ups(store: &mut dyn Storage, car_id: i64) -> Result<Vec<FillUp>> {
        let mut fill_ups = FuelRepository::new(store).list_for_car(car_id)?;
        sort_fill_ups(&mut fill_ups);
        Ok(fill_ups)
    }

    /// Turns a repository result into a response with consistent logging.
    ///
    /// Validation messages go back verbatim; other failures are prefixed with
    /// the operation name.
    fn handle_db_result<T, F>(operation: &str, result: Result<T>, on_success: F) -> WorkerResponse
    where
        F: FnOnce(T) -> WorkerResponse,
    {
        match result {
            Ok(value) => {
                tracing::debug!(operation = operation, "storage operation successful");
                on_success(value)
            }
            Err(e) => {
                let kind = e.kind();
                match kind {
                    ErrorKind::Validation => tracing::debug!(operation = operation, error = %e, "input rejected"),
                    ErrorKind::NotFound | ErrorKind::Storage => {
                        tracing::warn!(operation = operation, error = %e, "storage operation failed");
                    }
                }
                let message = if kind == ErrorKind::Validation {
                    e.to_string()
                } else {
                    format!("{operation}: {e}")
                };
                WorkerResponse::Error { kind, message }
            }
        }
    }

    fn handle_load_cars(&mut self) -> WorkerResponse {
        Self::handle_db_result("load cars", self.get_storage().and_then(Self::sorted_cars), |cars| {
            tracing::debug!(car_count = cars.len(), "cars loaded");
            WorkerResponse::CarsLoaded { cars }
        })
    }

    fn handle_load_fuel(&mut self, car_id: i64) -> WorkerResponse {
        Self::handle_db_result(
            "load fill-ups",
            self.get_storage().and_then(|store| Self::sorted_fill_ups(store, car_id)),
            |fill_ups| WorkerResponse::FuelLoaded { car_id, fill_ups },
        )
    }

    fn handle_save_car(&mut self, id: Option<i64>, details: &CarDetails) -> WorkerResponse {
        let operation = if id.is_some() { "update car" } else { "add car" };
        let result = self.get_storage().and_then(|store| {
            let mut repo = CarRepository::new(&mut *store);
            let id = match id {
                Some(id) => repo.update(id, details).map(|()| id)?,
                None => repo.add(details)?,
            };
            Ok((id, Self::sorted_cars(store)?))
        });
        Self::handle_db_result(operation, result, |(id, cars)| WorkerResponse::CarSaved { id, cars })
    }

    fn handle_delete_car(&mut self, id: i64) -> WorkerResponse {
        let result = self.get_storage().and_then(|store| {
            let removed = CarRepository::new(&mut *store).delete(id)?;
            Ok((removed, Self::sorted_cars(store)?))
        });
        Self::handle_db_result("delete car", result, |(removed, cars)| {
            tracing::debug!(car_id = id, removed = removed, "car and fill-ups removed");
            WorkerResponse::CarDeleted { id, removed, cars }
        })
    }

    fn handle_save_fuel(&mut self, id: Option<i64>, car_id: i64, details: &FillUpDetails) -> WorkerResponse {
        let operation = if id.is_some() { "update fill-up" } else { "add fill-up" };
        let result = self.get_storage().and_then(|store| {
            let mut repo = FuelRepository::new(&mut *store);
            let id = match id {
                Some(id) => repo.update(id, car_id, details).map(|()| id)?,
                None => repo.add(car_id, details)?,
            };
            Ok((id, Self::sorted_fill_ups(store, car_id)?))
        });
        Self::handle_db_result(operation, result, |(id, fill_ups)| WorkerResponse::FuelSaved {
            id,
            car_id,
            fill_ups,
        })
    }

    fn handle_delete_fuel(&mut self, id: i64, car_id: i64) -> WorkerResponse {
        let result = self.get_storage().and_then(|store| {
            FuelRepository::new(&mut *store).delete(id)?;
            Self::sorted_fill_ups(store, car_id)
        });
        Self::handle_db_result("delete fill-up", result, |fill_ups| WorkerResponse::FuelDeleted {
            id,
            car_id,
            fill_ups,
        })
    }

    /// Attaches the parent trace context carried by a message.
    ///
    /// Returns a context guard that must be held for the duration of the operation.
    fn attach_parent_trace_context(message: &WorkerMessage) -> Option<opentelemetry::ContextGuard> {
        use opentelemetry::trace::{SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState};

        let trace_context = message.trace_context()?;

        let trace_id = TraceId::from_hex(&trace_context.trace_id).ok()?;
        let span_id = SpanId::from_hex(&trace_context.parent_span_id).ok()?;

        let span_context = SpanContext::new(
            trace_id,
            span_id,
            TraceFlags::SAMPLED,
            true,
            TraceState::default(),
        );

        let otel_context = opentelemetry::Context::current().with_remote_span_context(span_context);

        Some(otel_context.attach())
    }

    /// Processes a worker message and returns the response.
    ///
    /// Attaches the message's trace context and opens a span for the
    /// operation before dispatching.
    pub fn handle_message(&mut self, message: WorkerMessage) -> WorkerResponse {
        let _context_guard = Self::attach_parent_trace_context(&message);

        let span = tracing::debug_span!("worker_handle_message", message_type = ?message);
        let _guard = span.entered();

        match message {
            WorkerMessage::LoadCars { .. } => self.handle_load_cars(),
            WorkerMessage::LoadFuel { car_id, .. } => self.handle_load_fuel(car_id),
            WorkerMessage::AddCar { details, .. } => self.handle_save_car(None, &details),
            WorkerMessage::UpdateCar { id, details, .. } => self.handle_save_car(Some(id), &details),
            WorkerMessage::DeleteCar { id, .. } => self.handle_delete_car(id),
            WorkerMessage::AddFuel { car_id, details, .. } => self.handle_save_fuel(None, car_id, &details),
            WorkerMessage::UpdateFuel { id, car_id, details, .. } => {
                self.handle_save_fuel(Some(id), car_id, &details)
            }
            WorkerMessage::DeleteFuel { id, car_id, .. } => self.handle_delete_fuel(id, car_id),
        }
    }

    /// Processes a JSON-serialized [`WorkerMessage`] and returns the
    /// JSON-serialized response.
    ///
    /// Malformed payloads produce an `Error` response rather than nothing, so
    /// the caller always hears back.
    pub fn handle_payload(&mut self, payload: &str) -> String {
        let response = match serde_json::from_str::<WorkerMessage>(payload) {
            Ok(message) => self.handle_message(message),
            Err(e) => {
                tracing::debug!(error = %e, "failed to deserialize worker message");
                WorkerResponse::Error {
                    kind: ErrorKind::Storage,
                    message: format!("malformed request: {e}"),
                }
            }
        };

        serde_json::to_string(&response).unwrap_or_else(|e| {
            tracing::debug!(error = %e, "failed to serialize worker response");
            format!(r#"{{"Error":{{"kind":"Storage","message":"malformed response: {e}"}}}}"#)
        })
    }
}
