//! Plain-text rendering of the view model.
//!
//! The renderer follows a two-step process:
//!
//! 1. **View Model Computation**: Transform `AppState` into `UIViewModel`
//! 2. **Text Layout**: Header, tiles or empty state, footer, then the dialog

use crate::app::AppState;
use crate::ui::viewmodel::UIViewModel;
use std::fmt::Write as _;

/// Renders the application to stdout.
pub fn render(state: &AppState) {
    print!("{}", render_to_string(&state.compute_viewmodel()));
}

/// Lays out a view model as text.
#[must_use]
pub fn render_to_string(vm: &UIViewModel) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "== {} ==", vm.header.title);

    if let Some(empty) = &vm.empty_state {
        let _ = writeln!(out, "  {}", empty.message);
        if !empty.subtitle.is_empty() {
            let _ = writeln!(out, "  {}", empty.subtitle);
        }
    }

    for item in &vm.display_items {
        match item.index {
            Some(i) => {
                let _ = writeln!(out, "  [{i}] {}  {}", item.label, item.detail);
            }
            None => {
                let _ = writeln!(out, "  {:<9} {}", format!("{}:", item.label), item.detail);
            }
        }
    }

    let _ = writeln!(out, "-- {}", vm.footer.keybindings);

    if let Some(dialog) = &vm.dialog {
        let buttons = if dialog.is_confirm { "[yes] [no]" } else { "[ok]" };
        let _ = writeln!(out, "\n** {} {buttons}", dialog.message);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{handle_event, Event, Feature};

    #[test]
    fn empty_main_panel() {
        let state = AppState::new(true);
        let text = render_to_string(&state.compute_viewmodel());
        assert!(text.starts_with("== Fuel Tracker =="));
        assert!(text.contains("No cars"));
    }

    #[test]
    fn dialog_is_drawn_last() {
        let mut state = AppState::new(true);
        handle_event(&mut state, &Event::ComingSoon(Feature::SignIn)).unwrap();
        let text = render_to_string(&state.compute_viewmodel());
        assert!(text.trim_end().ends_with("** Sign in/out coming soon... [ok]"));
    }
}
