//! View model types representing renderable UI state.
//!
//! View models are created via `AppState::compute_viewmodel()` and consumed by
//! the renderer. They contain no business logic, only display-ready data.

use crate::app::PanelKind;

/// Complete view of the top panel plus any open dialog.
#[derive(Debug, Clone)]
pub struct UIViewModel {
    /// Panel on top of the navigation stack.
    pub panel: PanelKind,

    pub header: HeaderInfo,

    /// Tiles or form fields of the panel.
    pub display_items: Vec<DisplayItem>,

    /// Shown in place of an empty tile list.
    pub empty_state: Option<EmptyState>,

    pub footer: FooterInfo,

    /// Topmost dialog, drawn above every panel.
    pub dialog: Option<DialogInfo>,

    /// Visible panels from bottom to top.
    pub layers: Vec<PanelKind>,

    pub transitioning: bool,
}

/// One tile or form row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayItem {
    /// Position for selectable tiles; `None` for form fields.
    pub index: Option<usize>,
    pub label: String,
    pub detail: String,
}

#[derive(Debug, Clone)]
pub struct HeaderInfo {
    pub title: String,
}

/// Hints for the commands available right now.
#[derive(Debug, Clone)]
pub struct FooterInfo {
    pub keybindings: String,
}

#[derive(Debug, Clone)]
pub struct EmptyState {
    pub message: String,
    pub subtitle: String,
}

#[derive(Debug, Clone)]
pub struct DialogInfo {
    pub message: String,
    /// Yes/No rather than OK.
    pub is_confirm: bool,
}
