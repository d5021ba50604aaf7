//! Actions representing side effects to be executed by the runtime.
//!
//! The event handler returns a `Vec<Action>` after processing each event. The
//! runtime executes them in order; a [`Action::PostToWorker`] produces a
//! [`crate::worker::WorkerResponse`] that comes back as an event.
//!
//! # Example
//!
//! ```
//! use fuel_tracker::app::Action;
//! use fuel_tracker::worker::WorkerMessage;
//!
//! let actions = vec![Action::PostToWorker(WorkerMessage::load_cars())];
//! assert_eq!(actions.len(), 1);
//! ```

use crate::worker::WorkerMessage;

/// Commands produced by the event handler.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Posts a repository request to the worker.
    PostToWorker(WorkerMessage),

    /// Ends the session.
    Quit,
}
