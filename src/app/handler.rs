//! Event handling and state transition logic.
//!
//! The handler follows a unidirectional data flow pattern:
//! 1. Events arrive from the runtime (user input, animation ends) or the worker
//! 2. [`handle_event`] pattern-matches the event type
//! 3. State mutations occur on [`AppState`]
//! 4. Actions are collected and returned for execution
//!
//! While a dialog is open it is modal: only dialog answers, animation ends,
//! worker responses and quitting are processed.
//!
//! # Example
//!
//! ```
//! use fuel_tracker::app::{handle_event, Action, AppState, Event};
//!
//! let mut state = AppState::new(true);
//! let (render, actions) = handle_event(&mut state, &Event::AddCar)?;
//! assert!(render);
//! assert!(actions.is_empty());
//! # Ok::<(), fuel_tracker::FuelTrackerError>(())
//! ```

use super::dialogs::{DialogOutcome, DialogPurpose};
use super::editors::{CarEditor, FuelEditor};
use super::modes::{CarField, FuelField, FuelFlag};
use super::panels::PanelKind;
use crate::app::{Action, AppState};
use crate::domain::error::Result;
use crate::domain::ErrorKind;
use crate::worker::{WorkerMessage, WorkerResponse};

/// Message shown when an operation referenced a record that no longer exists.
pub const GENERIC_FAILURE: &str = "Sorry, something went wrong. Please try again.";

/// Features that exist as buttons but are not implemented yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    SignIn,
    Upload,
    Download,
    Graph,
}

impl Feature {
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::SignIn => "Sign in/out coming soon...",
            Self::Upload => "Upload coming soon...",
            Self::Download => "Download coming soon...",
            Self::Graph => "Graphs coming soon...",
        }
    }

    /// Panel whose button triggers the feature.
    #[must_use]
    pub const fn panel(self) -> PanelKind {
        match self {
            Self::SignIn | Self::Upload | Self::Download => PanelKind::Main,
            Self::Graph => PanelKind::Car,
        }
    }
}

/// Events triggered by user input, animation completion, or worker responses.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// "+" on the main panel.
    AddCar,
    /// Tile at this position on the main panel.
    SelectCar(usize),
    /// Title of the car panel.
    EditCar,
    /// Trash on the car panel.
    DeleteCar,
    /// "+" on the car panel.
    AddFillUp,
    /// Tile at this position on the car panel.
    SelectFillUp(usize),
    /// Trash on the fuel editor.
    DeleteFillUp,

    SetCarField(CarField, String),
    SetFuelField(FuelField, String),
    ToggleFuelFlag(FuelFlag),

    /// Save on either editor.
    Save,
    /// Back button of the top panel.
    Back,

    /// Button press on the topmost dialog.
    DialogResult(bool),
    /// Escape key; only the topmost dialog reacts.
    Escape,

    /// The running panel animation finished.
    TransitionEnd,

    ComingSoon(Feature),

    WorkerResponse(WorkerResponse),

    Quit,
}

/// Processes an event, mutates application state, and returns actions to execute.
///
/// Returns whether the view should be re-rendered and the actions to run, in
/// order.
///
/// # Errors
///
/// Reserved for failures the runtime must see; user-facing failures become
/// dialogs instead.
#[allow(clippy::too_many_lines)]
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    if !state.dialogs.is_empty() && !passes_modal(event) {
        tracing::debug!("dialog open, event ignored");
        return Ok((false, vec![]));
    }

    let top = state.top_panel();

    match event {
        Event::AddCar => {
            if top != PanelKind::Main || !state.navigation.push(PanelKind::EditCar) {
                return Ok((false, vec![]));
            }
            state.car_editor = Some(CarEditor::add());
            Ok((true, vec![]))
        }

        Event::SelectCar(index) => {
            let Some(car) = state.cars.get(*index).cloned() else {
                tracing::debug!(index = index, "no car at index");
                return Ok((false, vec![]));
            };
            if top != PanelKind::Main || !state.navigation.push(PanelKind::Car) {
                return Ok((false, vec![]));
            }
            tracing::debug!(car_id = car.id, "showing car");
            let car_id = car.id;
            state.selected_car = Some(car);
            state.fill_ups.clear();
            Ok((true, vec![post(state, WorkerMessage::load_fuel(car_id))]))
        }

        Event::EditCar => {
            let Some(car) = state.selected_car.clone() else {
                return Ok((false, vec![]));
            };
            if top != PanelKind::Car || !state.navigation.push(PanelKind::EditCar) {
                return Ok((false, vec![]));
            }
            state.car_editor = Some(CarEditor::edit(&car));
            Ok((true, vec![]))
        }

        Event::DeleteCar => {
            let Some(car) = &state.selected_car else {
                return Ok((false, vec![]));
            };
            if top != PanelKind::Car {
                return Ok((false, vec![]));
            }
            let message = format!("Are you sure you want to delete your {}?", car.details.label());
            let purpose = DialogPurpose::DeleteCar { id: car.id };
            state.dialogs.confirm(message, purpose);
            Ok((true, vec![]))
        }

        Event::AddFillUp => {
            let Some(car_id) = state.selected_car_id() else {
                return Ok((false, vec![]));
            };
            if top != PanelKind::Car || !state.navigation.push(PanelKind::EditFuel) {
                return Ok((false, vec![]));
            }
            state.fuel_editor = Some(FuelEditor::add(car_id));
            Ok((true, vec![]))
        }

        Event::SelectFillUp(index) => {
            let Some(fill_up) = state.fill_ups.get(*index).cloned() else {
                tracing::debug!(index = index, "no fill-up at index");
                return Ok((false, vec![]));
            };
            if top != PanelKind::Car || !state.navigation.push(PanelKind::EditFuel) {
                return Ok((false, vec![]));
            }
            state.fuel_editor = Some(FuelEditor::edit(&fill_up));
            Ok((true, vec![]))
        }

        Event::DeleteFillUp => {
            let Some(editor) = state.fuel_editor.as_ref().filter(|e| e.can_delete()) else {
                return Ok((false, vec![]));
            };
            if top != PanelKind::EditFuel {
                return Ok((false, vec![]));
            }
            let Some(id) = editor.mode.id() else {
                return Ok((false, vec![]));
            };
            let purpose = DialogPurpose::DeleteFuel {
                id,
                car_id: editor.car_id,
            };
            state
                .dialogs
                .confirm("Are you sure you want to delete this fuel record?", purpose);
            Ok((true, vec![]))
        }

        Event::SetCarField(field, value) => match state.car_editor.as_mut() {
            Some(editor) if top == PanelKind::EditCar => {
                editor.set(*field, value);
                Ok((true, vec![]))
            }
            _ => Ok((false, vec![])),
        },

        Event::SetFuelField(field, value) => match state.fuel_editor.as_mut() {
            Some(editor) if top == PanelKind::EditFuel => {
                editor.set(*field, value);
                Ok((true, vec![]))
            }
            _ => Ok((false, vec![])),
        },

        Event::ToggleFuelFlag(flag) => match state.fuel_editor.as_mut() {
            Some(editor) if top == PanelKind::EditFuel => {
                editor.toggle(*flag);
                Ok((true, vec![]))
            }
            _ => Ok((false, vec![])),
        },

        Event::Save => Ok(handle_save(state, top)),

        Event::Back => {
            let modified = match top {
                PanelKind::Main => return Ok((false, vec![])),
                PanelKind::Car => false,
                PanelKind::EditCar => state.car_editor.as_ref().is_some_and(|e| e.modified),
                PanelKind::EditFuel => state.fuel_editor.as_ref().is_some_and(|e| e.modified),
            };
            if modified {
                state.dialogs.confirm(
                    "Are you sure you want to discard your changes?",
                    DialogPurpose::DiscardChanges,
                );
                return Ok((true, vec![]));
            }
            Ok((close_top_panel(state), vec![]))
        }

        Event::DialogResult(confirmed) => Ok(state
            .dialogs
            .resolve(*confirmed)
            .map_or((false, vec![]), |outcome| apply_dialog_outcome(state, outcome))),

        Event::Escape => Ok(state
            .dialogs
            .escape()
            .map_or((false, vec![]), |outcome| apply_dialog_outcome(state, outcome))),

        Event::TransitionEnd => Ok((state.navigation.on_transition_end(), vec![])),

        Event::ComingSoon(feature) => {
            if top != feature.panel() {
                return Ok((false, vec![]));
            }
            state.dialogs.alert(feature.message());
            Ok((true, vec![]))
        }

        Event::WorkerResponse(response) => Ok(handle_worker_response(state, response)),

        Event::Quit => Ok((false, vec![Action::Quit])),
    }
}

const fn passes_modal(event: &Event) -> bool {
    matches!(
        event,
        Event::DialogResult(_) | Event::Escape | Event::TransitionEnd | Event::WorkerResponse(_) | Event::Quit
    )
}

/// Records `message` as the request Retry would repeat.
fn post(state: &mut AppState, message: WorkerMessage) -> Action {
    state.post(message)
}

fn handle_save(state: &mut AppState, top: PanelKind) -> (bool, Vec<Action>) {
    let parsed = match top {
        PanelKind::EditCar => state.car_editor.as_ref().map(|editor| {
            editor.to_details().map(|details| match editor.mode.id() {
                Some(id) => WorkerMessage::update_car(id, details),
                None => WorkerMessage::add_car(details),
            })
        }),
        PanelKind::EditFuel => state.fuel_editor.as_ref().map(|editor| {
            editor.to_details().map(|details| match editor.mode.id() {
                Some(id) => WorkerMessage::update_fuel(id, editor.car_id, details),
                None => WorkerMessage::add_fuel(editor.car_id, details),
            })
        }),
        PanelKind::Main | PanelKind::Car => None,
    };

    match parsed {
        None => (false, vec![]),
        Some(Ok(message)) => (false, vec![post(state, message)]),
        Some(Err(e)) => {
            tracing::debug!(error = %e, "draft rejected");
            state.dialogs.alert(e.to_string());
            (true, vec![])
        }
    }
}

/// Pops the top panel and drops the transient state it owned.
fn close_top_panel(state: &mut AppState) -> bool {
    let Some(popped) = state.navigation.pop() else {
        return false;
    };
    match popped {
        PanelKind::EditCar => state.car_editor = None,
        PanelKind::EditFuel => state.fuel_editor = None,
        PanelKind::Car => {
            state.selected_car = None;
            state.fill_ups.clear();
        }
        PanelKind::Main => {}
    }
    true
}

fn apply_dialog_outcome(state: &mut AppState, outcome: DialogOutcome) -> (bool, Vec<Action>) {
    if !outcome.confirmed {
        return (true, vec![]);
    }

    match outcome.purpose {
        DialogPurpose::Notice => (true, vec![]),
        DialogPurpose::DeleteCar { id } => (true, vec![post(state, WorkerMessage::delete_car(id))]),
        DialogPurpose::DeleteFuel { id, car_id } => {
            (true, vec![post(state, WorkerMessage::delete_fuel(id, car_id))])
        }
        DialogPurpose::DiscardChanges => {
            close_top_panel(state);
            (true, vec![])
        }
        DialogPurpose::Retry(message) => {
            tracing::info!(request = ?message, "retrying request");
            (true, vec![post(state, message)])
        }
    }
}

/// Closes `editor` after a successful write if it is still on top.
fn finish_editing(state: &mut AppState, editor: PanelKind) {
    if state.top_panel() != editor {
        return;
    }
    match editor {
        PanelKind::EditCar => {
            if let Some(e) = state.car_editor.as_mut() {
                e.modified = false;
            }
        }
        PanelKind::EditFuel => {
            if let Some(e) = state.fuel_editor.as_mut() {
                e.modified = false;
            }
        }
        PanelKind::Main | PanelKind::Car => {}
    }
    close_top_panel(state);
}

fn handle_worker_response(state: &mut AppState, response: &WorkerResponse) -> (bool, Vec<Action>) {
    if !matches!(response, WorkerResponse::Error { .. }) {
        state.last_request = None;
    }

    match response {
        WorkerResponse::CarsLoaded { cars } => {
            tracing::debug!(car_count = cars.len(), "received cars");
            state.set_cars(cars.clone());
        }

        WorkerResponse::FuelLoaded { car_id, fill_ups } => {
            state.set_fill_ups(*car_id, fill_ups.clone());
        }

        WorkerResponse::CarSaved { id, cars } => {
            tracing::debug!(car_id = id, "car saved");
            state.set_cars(cars.clone());
            finish_editing(state, PanelKind::EditCar);
        }

        WorkerResponse::CarDeleted { id, removed, cars } => {
            tracing::info!(car_id = id, fill_ups = removed, "car deleted");
            state.set_cars(cars.clone());
            if state.selected_car_id() == Some(*id) && state.top_panel() == PanelKind::Car {
                close_top_panel(state);
            }
        }

        WorkerResponse::FuelSaved { car_id, fill_ups, .. } => {
            state.set_fill_ups(*car_id, fill_ups.clone());
            finish_editing(state, PanelKind::EditFuel);
        }

        WorkerResponse::FuelDeleted { car_id, fill_ups, .. } => {
            state.set_fill_ups(*car_id, fill_ups.clone());
            finish_editing(state, PanelKind::EditFuel);
        }

        WorkerResponse::Error { kind, message } => {
            tracing::warn!(kind = ?kind, message = %message, "worker request failed");
            match kind {
                ErrorKind::Validation => state.dialogs.alert(message.clone()),
                ErrorKind::NotFound => state.dialogs.alert(GENERIC_FAILURE),
                ErrorKind::Storage => {
                    // Without a recorded request the car list is what can be reloaded.
                    let request = state
                        .last_request
                        .clone()
                        .unwrap_or_else(WorkerMessage::load_cars);
                    state.dialogs.confirm(
                        format!("{message}\n\nRetry?"),
                        DialogPurpose::Retry(request),
                    );
                }
            }
        }
    }

    (true, vec![])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::dialogs::DialogKind;
    use crate::domain::{Car, CarDetails, FillUp, FillUpDetails};

    fn civic(id: i64) -> Car {
        Car {
            id,
            details: CarDetails {
                year: 2020,
                make: "Honda".to_string(),
                model: "Civic".to_string(),
                purchase_date: "2020-03-14".to_string(),
                purchase_mileage: 12,
            },
        }
    }

    fn fill_up(id: i64, car_id: i64) -> FillUp {
        FillUp {
            id,
            car_id,
            details: FillUpDetails {
                date: "2024-05-01".to_string(),
                mileage: 10_000,
                price_per_unit: 3.459,
                quantity: 11.2,
                total: 38.74,
                partial: false,
                missed: false,
            },
        }
    }

    fn on_car_panel() -> AppState {
        let mut state = AppState::new(true);
        state.set_cars(vec![civic(1)]);
        handle_event(&mut state, &Event::SelectCar(0)).unwrap();
        state
    }

    fn run(state: &mut AppState, event: Event) -> Vec<Action> {
        handle_event(state, &event).unwrap().1
    }

    #[test]
    fn selecting_a_car_loads_its_fill_ups() {
        let mut state = AppState::new(true);
        state.set_cars(vec![civic(1)]);
        let actions = run(&mut state, Event::SelectCar(0));

        assert_eq!(state.top_panel(), PanelKind::Car);
        assert!(matches!(
            actions.as_slice(),
            [Action::PostToWorker(WorkerMessage::LoadFuel { car_id: 1, .. })]
        ));
    }

    #[test]
    fn delete_car_asks_first_then_posts() {
        let mut state = on_car_panel();
        assert!(run(&mut state, Event::DeleteCar).is_empty());
        assert_eq!(
            state.dialogs.top().unwrap().message,
            "Are you sure you want to delete your 2020 Honda Civic?"
        );

        let actions = run(&mut state, Event::DialogResult(true));
        assert!(matches!(
            actions.as_slice(),
            [Action::PostToWorker(WorkerMessage::DeleteCar { id: 1, .. })]
        ));

        run(
            &mut state,
            Event::WorkerResponse(WorkerResponse::CarDeleted {
                id: 1,
                removed: 0,
                cars: vec![],
            }),
        );
        assert_eq!(state.top_panel(), PanelKind::Main);
        assert!(state.selected_car.is_none());
    }

    #[test]
    fn declined_delete_posts_nothing() {
        let mut state = on_car_panel();
        run(&mut state, Event::DeleteCar);
        assert!(run(&mut state, Event::Escape).is_empty());
        assert!(state.dialogs.is_empty());
        assert_eq!(state.top_panel(), PanelKind::Car);
    }

    #[test]
    fn back_with_unsaved_changes_asks_to_discard() {
        let mut state = AppState::new(true);
        run(&mut state, Event::AddCar);
        run(&mut state, Event::SetCarField(CarField::Make, "Kia".to_string()));
        run(&mut state, Event::Back);
        assert_eq!(
            state.dialogs.top().unwrap().message,
            "Are you sure you want to discard your changes?"
        );
        assert_eq!(state.top_panel(), PanelKind::EditCar);

        run(&mut state, Event::DialogResult(true));
        assert_eq!(state.top_panel(), PanelKind::Main);
        assert!(state.car_editor.is_none());
    }

    #[test]
    fn back_without_changes_pops_directly() {
        let mut state = AppState::new(true);
        run(&mut state, Event::AddCar);
        run(&mut state, Event::Back);
        assert!(state.dialogs.is_empty());
        assert_eq!(state.top_panel(), PanelKind::Main);
    }

    #[test]
    fn bad_draft_shows_validation_alert() {
        let mut state = AppState::new(true);
        run(&mut state, Event::AddCar);
        let actions = run(&mut state, Event::Save);
        assert!(actions.is_empty());
        let dialog = state.dialogs.top().unwrap();
        assert_eq!(dialog.kind, DialogKind::Alert);
        assert_eq!(dialog.message, "Year is required");
    }

    #[test]
    fn saved_car_closes_editor() {
        let mut state = AppState::new(true);
        run(&mut state, Event::AddCar);
        for (field, value) in [
            (CarField::Year, "2020"),
            (CarField::Make, "Honda"),
            (CarField::Model, "Civic"),
            (CarField::PurchaseMileage, "12"),
        ] {
            run(&mut state, Event::SetCarField(field, value.to_string()));
        }
        let actions = run(&mut state, Event::Save);
        assert!(matches!(
            actions.as_slice(),
            [Action::PostToWorker(WorkerMessage::AddCar { .. })]
        ));

        run(
            &mut state,
            Event::WorkerResponse(WorkerResponse::CarSaved {
                id: 1,
                cars: vec![civic(1)],
            }),
        );
        assert_eq!(state.top_panel(), PanelKind::Main);
        assert_eq!(state.cars.len(), 1);
        assert!(state.last_request.is_none());
    }

    #[test]
    fn editing_the_shown_car_updates_its_title() {
        let mut state = on_car_panel();
        run(&mut state, Event::EditCar);
        assert_eq!(state.car_editor.as_ref().unwrap().title(), "Edit Car");

        let mut renamed = civic(1);
        renamed.details.model = "Accord".to_string();
        run(
            &mut state,
            Event::WorkerResponse(WorkerResponse::CarSaved {
                id: 1,
                cars: vec![renamed],
            }),
        );
        assert_eq!(state.top_panel(), PanelKind::Car);
        assert_eq!(state.compute_viewmodel().header.title, "2020 Honda Accord");
    }

    #[test]
    fn fuel_trash_only_in_edit_mode() {
        let mut state = on_car_panel();
        run(&mut state, Event::AddFillUp);
        run(&mut state, Event::DeleteFillUp);
        assert!(state.dialogs.is_empty());
        run(&mut state, Event::Back);

        state.set_fill_ups(1, vec![fill_up(5, 1)]);
        run(&mut state, Event::SelectFillUp(0));
        run(&mut state, Event::DeleteFillUp);
        assert_eq!(
            state.dialogs.top().unwrap().message,
            "Are you sure you want to delete this fuel record?"
        );
        let actions = run(&mut state, Event::DialogResult(true));
        assert!(matches!(
            actions.as_slice(),
            [Action::PostToWorker(WorkerMessage::DeleteFuel { id: 5, car_id: 1, .. })]
        ));
    }

    #[test]
    fn storage_error_offers_retry_of_last_request() {
        let mut state = on_car_panel();
        run(
            &mut state,
            Event::WorkerResponse(WorkerResponse::Error {
                kind: ErrorKind::Storage,
                message: "load fill-ups: Storage error: disk".to_string(),
            }),
        );
        let dialog = state.dialogs.top().unwrap();
        assert_eq!(dialog.kind, DialogKind::Confirm);
        assert!(dialog.message.starts_with("load fill-ups: Storage error: disk"));

        let actions = run(&mut state, Event::DialogResult(true));
        assert!(matches!(
            actions.as_slice(),
            [Action::PostToWorker(WorkerMessage::LoadFuel { car_id: 1, .. })]
        ));
    }

    #[test]
    fn failed_initial_load_offers_retry() {
        let mut state = AppState::new(true);
        let initial = state.load_cars();
        assert!(matches!(initial, Action::PostToWorker(WorkerMessage::LoadCars { .. })));

        run(
            &mut state,
            Event::WorkerResponse(WorkerResponse::Error {
                kind: ErrorKind::Storage,
                message: "load cars: IO error: Not a directory (os error 20)".to_string(),
            }),
        );
        let dialog = state.dialogs.top().unwrap();
        assert_eq!(dialog.kind, DialogKind::Confirm);
        assert!(dialog.message.ends_with("Retry?"));

        let actions = run(&mut state, Event::DialogResult(true));
        assert!(matches!(
            actions.as_slice(),
            [Action::PostToWorker(WorkerMessage::LoadCars { .. })]
        ));
        assert!(state.last_request.is_some());
    }

    #[test]
    fn storage_error_without_a_request_reloads_cars() {
        let mut state = AppState::new(true);
        run(
            &mut state,
            Event::WorkerResponse(WorkerResponse::Error {
                kind: ErrorKind::Storage,
                message: "disk".to_string(),
            }),
        );
        assert_eq!(state.dialogs.top().unwrap().kind, DialogKind::Confirm);
        let actions = run(&mut state, Event::DialogResult(true));
        assert!(matches!(
            actions.as_slice(),
            [Action::PostToWorker(WorkerMessage::LoadCars { .. })]
        ));
    }

    #[test]
    fn not_found_is_a_generic_alert() {
        let mut state = AppState::new(true);
        run(
            &mut state,
            Event::WorkerResponse(WorkerResponse::Error {
                kind: ErrorKind::NotFound,
                message: "update car: no record 3 in cars".to_string(),
            }),
        );
        assert_eq!(state.dialogs.top().unwrap().message, GENERIC_FAILURE);
    }

    #[test]
    fn dialogs_are_modal() {
        let mut state = AppState::new(true);
        run(&mut state, Event::ComingSoon(Feature::Upload));
        assert_eq!(state.dialogs.top().unwrap().message, "Upload coming soon...");

        run(&mut state, Event::AddCar);
        assert_eq!(state.top_panel(), PanelKind::Main);
        run(&mut state, Event::DialogResult(true));
        assert!(state.dialogs.is_empty());
    }

    #[test]
    fn navigation_waits_for_transition_end() {
        let mut state = AppState::new(false);
        state.set_cars(vec![civic(1)]);
        run(&mut state, Event::SelectCar(0));
        run(&mut state, Event::AddFillUp);
        assert_eq!(state.top_panel(), PanelKind::Car);
        assert!(state.fuel_editor.is_none());

        let (render, _) = handle_event(&mut state, &Event::TransitionEnd).unwrap();
        assert!(render);
        run(&mut state, Event::AddFillUp);
        assert_eq!(state.top_panel(), PanelKind::EditFuel);
    }
}
