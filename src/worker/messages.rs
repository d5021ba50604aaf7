//! Worker message types.
//!
//! This module defines the request and response protocol between the
//! application event loop and the worker that owns the record store. Every
//! request is one repository call; every successful mutation response carries
//! the affected collection re-read and re-sorted for display. It also
//! implements tracing context propagation across the worker boundary.

use crate::domain::{Car, CarDetails, ErrorKind, FillUp, FillUpDetails};
use serde::{Deserialize, Serialize};

/// Distributed tracing context for cross-boundary span propagation.
///
/// Captures the current trace and span IDs from OpenTelemetry so spans opened
/// by the worker are parented to the UI span that posted the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Parent span ID for linking spans.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Creates a trace context from the current tracing span.
    ///
    /// Returns `None` if the current span context is invalid or not sampled,
    /// which is always the case when tracing has not been initialized.
    ///
    /// # Examples
    ///
    /// ```
    /// use fuel_tracker::worker::TraceContext;
    ///
    /// // No subscriber installed, so there is nothing to capture.
    /// assert!(TraceContext::from_current().is_none());
    /// ```
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let span = tracing::Span::current();

        let otel_context = span.context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if span_context.is_valid() {
            let trace_id_str = format!("{:032x}", span_context.trace_id());
            let parent_span_id_str = format!("{:016x}", span_context.span_id());

            tracing::trace!(
                trace_id = %trace_id_str,
                parent_span_id = %parent_span_id_str,
                "capturing trace context"
            );

            Some(Self {
                trace_id: trace_id_str,
                parent_span_id: parent_span_id_str,
            })
        } else {
            None
        }
    }
}

/// Generates builder methods for `WorkerMessage` variants.
///
/// Each constructor attaches the current trace context to the message.
macro_rules! worker_message_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl WorkerMessage {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " message with current trace context")]
                #[must_use]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

worker_message_builders! {
    load_cars(LoadCars {}),
    load_fuel(LoadFuel { car_id: i64 }),
    add_car(AddCar { details: CarDetails }),
    update_car(UpdateCar { id: i64, details: CarDetails }),
    delete_car(DeleteCar { id: i64 }),
    add_fuel(AddFuel { car_id: i64, details: FillUpDetails }),
    update_fuel(UpdateFuel { id: i64, car_id: i64, details: FillUpDetails }),
    delete_fuel(DeleteFuel { id: i64, car_id: i64 }),
}

/// Requests sent to the worker.
///
/// Each variant is one repository operation. All variants carry an optional
/// trace context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorkerMessage {
    /// Read every car.
    LoadCars {
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Read the fill-ups of one car.
    LoadFuel {
        car_id: i64,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Insert a new car.
    AddCar {
        details: CarDetails,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Replace an existing car.
    UpdateCar {
        id: i64,
        details: CarDetails,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Delete a car and its fill-ups.
    DeleteCar {
        id: i64,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Insert a fill-up for a car.
    AddFuel {
        car_id: i64,
        details: FillUpDetails,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Replace an existing fill-up.
    UpdateFuel {
        id: i64,
        car_id: i64,
        details: FillUpDetails,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Delete one fill-up. `car_id` selects the list returned afterwards.
    DeleteFuel {
        id: i64,
        car_id: i64,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
}

impl WorkerMessage {
    /// Trace context attached to the message, if any.
    #[must_use]
    pub const fn trace_context(&self) -> Option<&TraceContext> {
        match self {
            Self::LoadCars { trace_context }
            | Self::LoadFuel { trace_context, .. }
            | Self::AddCar { trace_context, .. }
            | Self::UpdateCar { trace_context, .. }
            | Self::DeleteCar { trace_context, .. }
            | Self::AddFuel { trace_context, .. }
            | Self::UpdateFuel { trace_context, .. }
            | Self::DeleteFuel { trace_context, .. } => trace_context.as_ref(),
        }
    }

    /// Whether the request writes to the store.
    #[must_use]
    pub const fn is_mutation(&self) -> bool {
        !matches!(self, Self::LoadCars { .. } | Self::LoadFuel { .. })
    }
}

/// Responses sent back from the worker.
///
/// Lists are already sorted into display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorkerResponse {
    /// Every car.
    CarsLoaded { cars: Vec<Car> },

    /// The fill-ups of one car.
    FuelLoaded { car_id: i64, fill_ups: Vec<FillUp> },

    /// A car was added or updated.
    CarSaved {
        /// Id of the saved car.
        id: i64,
        /// Every car after the write.
        cars: Vec<Car>,
    },

    /// A car was deleted with its fill-ups.
    CarDeleted {
        id: i64,
        /// Number of fill-ups removed with it.
        removed: usize,
        cars: Vec<Car>,
    },

    /// A fill-up was added or updated.
    FuelSaved {
        id: i64,
        car_id: i64,
        /// The car's fill-ups after the write.
        fill_ups: Vec<FillUp>,
    },

    /// A fill-up was deleted.
    FuelDeleted {
        id: i64,
        car_id: i64,
        fill_ups: Vec<FillUp>,
    },

    /// The request failed.
    Error {
        /// Classification that decides how the failure is surfaced.
        kind: ErrorKind,

        /// Human-readable error message.
        message: String,
    },
}
