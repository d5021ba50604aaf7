//! Panel navigation controller.
//!
//! Maintains the stack of visible panels and runs one transition at a time.
//! A push or pop requested while a transition is in flight is dropped, not
//! queued. The runtime reports the end of an animation through
//! [`NavigationController::on_transition_end`]; with reduced motion the
//! controller completes every transition immediately, so navigation can never
//! wedge waiting for an animation that is not played.
//!
//! # State Machine
//!
//! ```text
//!            push / pop (accepted)
//!   Idle ─────────────────────────────▶ Transitioning
//!    ▲                                        │
//!    └──────────── on_transition_end ─────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use fuel_tracker::app::{NavigationController, PanelKind};
//!
//! let mut nav = NavigationController::new(false);
//! assert!(nav.push(PanelKind::Main));
//! assert!(nav.push(PanelKind::Car));
//! // Still animating: this request is dropped.
//! assert!(!nav.push(PanelKind::EditFuel));
//! nav.on_transition_end();
//! assert_eq!(nav.stack(), &[PanelKind::Main, PanelKind::Car]);
//! ```

use super::panels::{PanelKind, SINGLETON_PANELS};
use std::collections::BTreeMap;

/// Whether an animation is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Transitioning,
}

/// Animation role of a panel during a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelMarker {
    /// Entering on top of the stack.
    Show,
    /// Being covered by the entering panel.
    Cover,
    /// Revealed by the leaving panel.
    Uncover,
    /// Leaving the stack.
    Hide,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct PanelState {
    visible: bool,
    marker: Option<PanelMarker>,
}

/// Stack of panels with single-flight transitions.
#[derive(Debug, Clone)]
pub struct NavigationController {
    stack: Vec<PanelKind>,
    phase: Phase,
    reduced_motion: bool,
    panels: BTreeMap<PanelKind, PanelState>,
    /// Panel to hide once the running transition completes.
    outgoing: Option<PanelKind>,
}

impl NavigationController {
    #[must_use]
    pub fn new(reduced_motion: bool) -> Self {
        Self {
            stack: Vec::new(),
            phase: Phase::Idle,
            reduced_motion,
            panels: BTreeMap::new(),
            outgoing: None,
        }
    }

    /// Shows `panel` on top of the stack.
    ///
    /// Returns `false` when the request was dropped: a transition is running,
    /// or the panel is already on the stack ([`SINGLETON_PANELS`]). The first
    /// panel is shown without a transition.
    pub fn push(&mut self, panel: PanelKind) -> bool {
        if self.phase == Phase::Transitioning {
            tracing::debug!(panel = %panel, "push dropped, transition in flight");
            return false;
        }
        // One slot per panel kind, see `SINGLETON_PANELS`.
        if SINGLETON_PANELS && self.stack.contains(&panel) {
            tracing::debug!(panel = %panel, "push dropped, panel already shown");
            return false;
        }

        match self.stack.last().copied() {
            Some(previous) => {
                self.set(panel, true, Some(PanelMarker::Show));
                self.set(previous, true, Some(PanelMarker::Cover));
                self.begin(previous);
            }
            None => self.set(panel, true, None),
        }
        self.stack.push(panel);

        tracing::debug!(panel = %panel, depth = self.stack.len(), "panel pushed");
        self.finish_if_reduced();
        true
    }

    /// Removes the top panel, revealing the one below it.
    ///
    /// Returns the removed panel, or `None` when the request was dropped: a
    /// transition is running, or only the root panel is left.
    pub fn pop(&mut self) -> Option<PanelKind> {
        if self.phase == Phase::Transitioning {
            tracing::debug!("pop dropped, transition in flight");
            return None;
        }
        if self.stack.len() < 2 {
            tracing::debug!("pop dropped, root panel cannot be removed");
            return None;
        }

        let popped = self.stack.pop()?;
        if let Some(&revealed) = self.stack.last() {
            self.set(revealed, true, Some(PanelMarker::Uncover));
        }
        self.set(popped, true, Some(PanelMarker::Hide));
        self.begin(popped);

        tracing::debug!(panel = %popped, depth = self.stack.len(), "panel popped");
        self.finish_if_reduced();
        Some(popped)
    }

    /// Completes the running transition.
    ///
    /// The covered or popped panel is hidden and every marker is cleared.
    /// Returns `false` if no transition was running.
    pub fn on_transition_end(&mut self) -> bool {
        if self.phase == Phase::Idle {
            return false;
        }

        if let Some(outgoing) = self.outgoing.take() {
            self.set(outgoing, false, None);
        }
        for state in self.panels.values_mut() {
            state.marker = None;
        }
        self.phase = Phase::Idle;
        tracing::trace!("transition complete");
        true
    }

    fn begin(&mut self, outgoing: PanelKind) {
        self.outgoing = Some(outgoing);
        self.phase = Phase::Transitioning;
    }

    fn finish_if_reduced(&mut self) {
        if self.reduced_motion {
            self.on_transition_end();
        }
    }

    fn set(&mut self, panel: PanelKind, visible: bool, marker: Option<PanelMarker>) {
        self.panels.insert(panel, PanelState { visible, marker });
    }

    #[must_use]
    pub fn stack(&self) -> &[PanelKind] {
        &self.stack
    }

    #[must_use]
    pub fn top(&self) -> Option<PanelKind> {
        self.stack.last().copied()
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.phase == Phase::Transitioning
    }

    #[must_use]
    pub fn is_visible(&self, panel: PanelKind) -> bool {
        self.panels.get(&panel).is_some_and(|s| s.visible)
    }

    #[must_use]
    pub fn marker(&self, panel: PanelKind) -> Option<PanelMarker> {
        self.panels.get(&panel).and_then(|s| s.marker)
    }

    /// Visible panels from bottom to top by stacking priority.
    #[must_use]
    pub fn visible_panels(&self) -> Vec<PanelKind> {
        let mut visible: Vec<PanelKind> = self
            .panels
            .iter()
            .filter(|(_, s)| s.visible)
            .map(|(panel, _)| *panel)
            .collect();
        visible.sort_by_key(|panel| panel.z_order());
        visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settled(panels: &[PanelKind]) -> NavigationController {
        let mut nav = NavigationController::new(false);
        for &panel in panels {
            assert!(nav.push(panel));
            nav.on_transition_end();
        }
        nav
    }

    #[test]
    fn first_push_needs_no_transition() {
        let mut nav = NavigationController::new(false);
        assert!(nav.push(PanelKind::Main));
        assert_eq!(nav.phase(), Phase::Idle);
        assert!(nav.is_visible(PanelKind::Main));
        assert_eq!(nav.marker(PanelKind::Main), None);
    }

    #[test]
    fn push_during_transition_is_dropped() {
        let mut nav = NavigationController::new(false);
        nav.push(PanelKind::Main);
        nav.push(PanelKind::Car);
        assert!(nav.is_transitioning());

        assert!(!nav.push(PanelKind::EditCar));
        assert_eq!(nav.stack(), &[PanelKind::Main, PanelKind::Car]);

        nav.on_transition_end();
        assert!(nav.push(PanelKind::EditCar));
        assert_eq!(nav.stack(), &[PanelKind::Main, PanelKind::Car, PanelKind::EditCar]);
    }

    #[test]
    fn push_marks_show_and_cover_then_hides_covered() {
        let mut nav = settled(&[PanelKind::Main]);
        nav.push(PanelKind::Car);
        assert_eq!(nav.marker(PanelKind::Car), Some(PanelMarker::Show));
        assert_eq!(nav.marker(PanelKind::Main), Some(PanelMarker::Cover));

        nav.on_transition_end();
        assert!(!nav.is_visible(PanelKind::Main));
        assert!(nav.is_visible(PanelKind::Car));
        assert_eq!(nav.marker(PanelKind::Car), None);
        assert_eq!(nav.marker(PanelKind::Main), None);
    }

    #[test]
    fn pop_marks_uncover_and_hide() {
        let mut nav = settled(&[PanelKind::Main, PanelKind::Car]);
        assert_eq!(nav.pop(), Some(PanelKind::Car));
        assert_eq!(nav.marker(PanelKind::Main), Some(PanelMarker::Uncover));
        assert_eq!(nav.marker(PanelKind::Car), Some(PanelMarker::Hide));
        assert!(nav.pop().is_none());

        nav.on_transition_end();
        assert_eq!(nav.stack(), &[PanelKind::Main]);
        assert!(nav.is_visible(PanelKind::Main));
        assert!(!nav.is_visible(PanelKind::Car));
    }

    #[test]
    fn root_cannot_be_popped() {
        let mut nav = settled(&[PanelKind::Main]);
        assert!(nav.pop().is_none());
        assert_eq!(nav.stack(), &[PanelKind::Main]);
        assert_eq!(nav.phase(), Phase::Idle);
    }

    #[test]
    fn reduced_motion_completes_synchronously() {
        let mut nav = NavigationController::new(true);
        nav.push(PanelKind::Main);
        assert!(nav.push(PanelKind::Car));
        assert!(!nav.is_transitioning());
        assert!(nav.push(PanelKind::EditFuel));
        assert_eq!(nav.pop(), Some(PanelKind::EditFuel));
        assert_eq!(nav.stack(), &[PanelKind::Main, PanelKind::Car]);
    }

    #[test]
    fn spurious_transition_end_is_ignored() {
        let mut nav = settled(&[PanelKind::Main]);
        assert!(!nav.on_transition_end());
        assert!(nav.is_visible(PanelKind::Main));
    }

    #[test]
    fn panels_are_singletons() {
        let mut nav = settled(&[PanelKind::Main, PanelKind::Car]);
        assert!(!nav.push(PanelKind::Main));
        assert_eq!(nav.stack().len(), 2);
        assert_eq!(nav.stack(), &[PanelKind::Main, PanelKind::Car]);
        assert_eq!(nav.phase(), Phase::Idle);
    }

    #[test]
    fn visible_panels_follow_z_order_not_push_order() {
        let mut nav = settled(&[PanelKind::Main, PanelKind::EditFuel]);
        nav.pop();
        nav.on_transition_end();
        nav.push(PanelKind::Car);
        assert_eq!(nav.visible_panels(), vec![PanelKind::Main, PanelKind::Car]);
    }
}
