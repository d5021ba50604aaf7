//! Modal dialogs layered above the panels.
//!
//! Dialogs form a LIFO stack. Only the topmost dialog reacts to Escape, which
//! resolves it with a negative answer; dialogs underneath stay open.

use crate::worker::WorkerMessage;

/// Shape of a dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    /// Yes/No question.
    Confirm,
    /// Message with a single OK button.
    Alert,
}

/// What happens once a dialog is answered.
#[derive(Debug, Clone, PartialEq)]
pub enum DialogPurpose {
    /// Informational; nothing follows.
    Notice,
    /// Delete the car shown on the car panel.
    DeleteCar { id: i64 },
    /// Delete the fill-up open in the fuel editor.
    DeleteFuel { id: i64, car_id: i64 },
    /// Leave the top editor without saving.
    DiscardChanges,
    /// Post a request that failed again.
    Retry(WorkerMessage),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dialog {
    pub kind: DialogKind,
    pub message: String,
    pub purpose: DialogPurpose,
}

/// A resolved dialog and the user's answer.
///
/// Alerts always resolve with `confirmed == true` unless dismissed by Escape.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogOutcome {
    pub purpose: DialogPurpose,
    pub confirmed: bool,
}

#[derive(Debug, Clone, Default)]
pub struct DialogStack {
    dialogs: Vec<Dialog>,
}

impl DialogStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn confirm(&mut self, message: impl Into<String>, purpose: DialogPurpose) {
        self.open(DialogKind::Confirm, message.into(), purpose);
    }

    pub fn alert(&mut self, message: impl Into<String>) {
        self.open(DialogKind::Alert, message.into(), DialogPurpose::Notice);
    }

    fn open(&mut self, kind: DialogKind, message: String, purpose: DialogPurpose) {
        tracing::debug!(kind = ?kind, message = %message, depth = self.dialogs.len() + 1, "dialog opened");
        self.dialogs.push(Dialog { kind, message, purpose });
    }

    /// Answers the topmost dialog with a button press.
    pub fn resolve(&mut self, confirmed: bool) -> Option<DialogOutcome> {
        let dialog = self.dialogs.pop()?;
        tracing::debug!(kind = ?dialog.kind, confirmed = confirmed, "dialog resolved");
        Some(DialogOutcome {
            purpose: dialog.purpose,
            confirmed,
        })
    }

    /// Dismisses the topmost dialog with a negative answer.
    pub fn escape(&mut self) -> Option<DialogOutcome> {
        self.resolve(false)
    }

    #[must_use]
    pub fn top(&self) -> Option<&Dialog> {
        self.dialogs.last()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dialogs.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.dialogs.len()
    }
}
