//! Application layer coordinating state, events, and actions.
//!
//! This module sits between the runtime (main.rs) and the worker. It owns the
//! panel navigation controller, the dialog stack and the transient editors.
//!
//! # Architecture
//!
//! The application layer follows a unidirectional data flow pattern:
//!
//! ```text
//! User Input → Events → Event Handler → State Mutations → Actions → Side Effects
//!                           ↑                                  ↓
//!                           └──────── Worker Responses ────────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`dialogs`]: LIFO stack of confirm/alert dialogs
//! - [`editors`]: String drafts of the car and fuel forms
//! - [`handler`]: Event processing logic and state transition coordinator
//! - [`modes`]: Editor mode and field identifiers
//! - [`navigation`]: Panel stack with single-flight transitions
//! - [`panels`]: Panel identities and stacking priority
//! - [`state`]: Central application state container and view model computation

pub mod actions;
pub mod dialogs;
pub mod editors;
pub mod handler;
pub mod modes;
pub mod navigation;
pub mod panels;
pub mod state;

pub use actions::Action;
pub use dialogs::{Dialog, DialogKind, DialogOutcome, DialogPurpose, DialogStack};
pub use editors::{CarEditor, FuelEditor};
pub use handler::{handle_event, Event, Feature};
pub use modes::{CarField, EditMode, FuelField, FuelFlag};
pub use navigation::{NavigationController, PanelMarker, Phase};
pub use panels::{PanelKind, SINGLETON_PANELS};
pub use state::AppState;
