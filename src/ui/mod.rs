//! User interface layer for the console runtime.
//!
//! ```text
//! AppState → compute_viewmodel → UIViewModel → render → text
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: View model types representing renderable UI state
//! - [`renderer`]: Plain-text layout of a view model

pub mod renderer;
pub mod viewmodel;

pub use renderer::{render, render_to_string};
pub use viewmodel::{DialogInfo, DisplayItem, EmptyState, FooterInfo, HeaderInfo, UIViewModel};
