//! Application state and view model computation.
//!
//! [`AppState`] is the explicit application context: the sorted collections
//! last returned by the worker, the navigation stack, the dialog stack and the
//! open editors. It is created once by [`crate::initialize`] and mutated only
//! by [`crate::app::handle_event`].

use super::actions::Action;
use super::dialogs::{DialogKind, DialogStack};
use super::editors::{CarEditor, FuelEditor};
use super::navigation::NavigationController;
use super::panels::PanelKind;
use crate::domain::{Car, FillUp};
use crate::ui::viewmodel::{DialogInfo, DisplayItem, EmptyState, FooterInfo, HeaderInfo, UIViewModel};
use crate::worker::WorkerMessage;

/// Central application state container.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Every car, in display order.
    pub cars: Vec<Car>,

    /// Car shown on the car panel.
    pub selected_car: Option<Car>,

    /// Fill-ups of `selected_car`, in display order.
    pub fill_ups: Vec<FillUp>,

    pub car_editor: Option<CarEditor>,
    pub fuel_editor: Option<FuelEditor>,

    pub navigation: NavigationController,
    pub dialogs: DialogStack,

    /// Most recent request posted to the worker, re-posted by Retry.
    pub last_request: Option<WorkerMessage>,
}

impl AppState {
    /// Creates the state with the main panel shown and no data loaded yet.
    #[must_use]
    pub fn new(reduced_motion: bool) -> Self {
        let mut navigation = NavigationController::new(reduced_motion);
        navigation.push(PanelKind::Main);
        Self {
            cars: Vec::new(),
            selected_car: None,
            fill_ups: Vec::new(),
            car_editor: None,
            fuel_editor: None,
            navigation,
            dialogs: DialogStack::new(),
            last_request: None,
        }
    }

    #[must_use]
    pub fn top_panel(&self) -> PanelKind {
        self.navigation.top().unwrap_or(PanelKind::Main)
    }

    #[must_use]
    pub fn selected_car_id(&self) -> Option<i64> {
        self.selected_car.as_ref().map(|car| car.id)
    }

    /// Replaces the car list and refreshes the car panel header from it.
    pub fn set_cars(&mut self, cars: Vec<Car>) {
        if let Some(selected) = &self.selected_car {
            if let Some(fresh) = cars.iter().find(|car| car.id == selected.id) {
                self.selected_car = Some(fresh.clone());
            }
        }
        self.cars = cars;
    }

    /// Records `message` as the request a storage-error Retry re-posts and
    /// wraps it in an action for the runtime.
    pub fn post(&mut self, message: WorkerMessage) -> Action {
        self.last_request = Some(message.clone());
        Action::PostToWorker(message)
    }

    /// Requests the car list, as the runtime does at startup.
    pub fn load_cars(&mut self) -> Action {
        self.post(WorkerMessage::load_cars())
    }

    /// Replaces the fill-up list if it belongs to the car on display.
    pub fn set_fill_ups(&mut self, car_id: i64, fill_ups: Vec<FillUp>) {
        if self.selected_car_id() == Some(car_id) {
            self.fill_ups = fill_ups;
        } else {
            tracing::debug!(car_id = car_id, "ignoring fill-ups of a car no longer shown");
        }
    }

    /// Computes the display-ready view of the top panel and dialog.
    #[must_use]
    pub fn compute_viewmodel(&self) -> UIViewModel {
        let top = self.top_panel();
        let (title, items, empty_state) = match top {
            PanelKind::Main => self.main_body(),
            PanelKind::Car => self.car_body(),
            PanelKind::EditCar => self.car_editor_body(),
            PanelKind::EditFuel => self.fuel_editor_body(),
        };

        UIViewModel {
            panel: top,
            header: HeaderInfo { title },
            display_items: items,
            empty_state,
            footer: self.compute_footer(top),
            dialog: self.dialogs.top().map(|d| DialogInfo {
                message: d.message.clone(),
                is_confirm: d.kind == DialogKind::Confirm,
            }),
            layers: self.navigation.visible_panels(),
            transitioning: self.navigation.is_transitioning(),
        }
    }

    fn main_body(&self) -> (String, Vec<DisplayItem>, Option<EmptyState>) {
        let items: Vec<DisplayItem> = self
            .cars
            .iter()
            .enumerate()
            .map(|(i, car)| DisplayItem {
                index: Some(i),
                label: car.details.label(),
                detail: format!(
                    "purchased {} at {}",
                    car.details.purchase_date, car.details.purchase_mileage
                ),
            })
            .collect();
        let empty_state = items.is_empty().then(|| EmptyState {
            message: "No cars".to_string(),
            subtitle: "Add a car to start tracking fill-ups".to_string(),
        });
        ("Fuel Tracker".to_string(), items, empty_state)
    }

    fn car_body(&self) -> (String, Vec<DisplayItem>, Option<EmptyState>) {
        let title = self
            .selected_car
            .as_ref()
            .map_or_else(String::new, |car| car.details.label());

        let items: Vec<DisplayItem> = self
            .fill_ups
            .iter()
            .enumerate()
            .map(|(i, fill_up)| {
                let d = &fill_up.details;
                let mut detail = format!(
                    "{}  {:.3} x {:.3} = {:.2}",
                    d.mileage, d.price_per_unit, d.quantity, d.total
                );
                if d.partial {
                    detail.push_str("  partial");
                }
                if d.missed {
                    detail.push_str("  missed");
                }
                DisplayItem {
                    index: Some(i),
                    label: d.date.clone(),
                    detail,
                }
            })
            .collect();

        let empty_state = items.is_empty().then(|| EmptyState {
            message: "No records".to_string(),
            subtitle: String::new(),
        });
        (title, items, empty_state)
    }

    fn car_editor_body(&self) -> (String, Vec<DisplayItem>, Option<EmptyState>) {
        let Some(editor) = &self.car_editor else {
            return (String::new(), Vec::new(), None);
        };
        let items = [
            ("year", &editor.year),
            ("make", &editor.make),
            ("model", &editor.model),
            ("purchase", &editor.purchase_date),
            ("mileage", &editor.purchase_mileage),
        ]
        .into_iter()
        .map(|(label, value)| DisplayItem {
            index: None,
            label: label.to_string(),
            detail: value.clone(),
        })
        .collect();
        (editor.title().to_string(), items, None)
    }

    fn fuel_editor_body(&self) -> (String, Vec<DisplayItem>, Option<EmptyState>) {
        let Some(editor) = &self.fuel_editor else {
            return (String::new(), Vec::new(), None);
        };
        let check = |on: bool| String::from(if on { "[x]" } else { "[ ]" });
        let items = vec![
            ("date", editor.date.clone()),
            ("mileage", editor.mileage.clone()),
            ("price", editor.price.clone()),
            ("quantity", editor.quantity.clone()),
            ("total", editor.total.clone()),
            ("partial", check(editor.partial)),
            ("missed", check(editor.missed)),
        ]
        .into_iter()
        .map(|(label, detail)| DisplayItem {
            index: None,
            label: label.to_string(),
            detail,
        })
        .collect();
        (editor.title().to_string(), items, None)
    }

    fn compute_footer(&self, top: PanelKind) -> FooterInfo {
        let keybindings = match self.dialogs.top().map(|d| d.kind) {
            Some(DialogKind::Confirm) => "yes  no  esc".to_string(),
            Some(DialogKind::Alert) => "ok  esc".to_string(),
            None => match top {
                PanelKind::Main => "add  open N  signin  upload  download  quit".to_string(),
                PanelKind::Car => "edit  add  open N  graph  delete  back".to_string(),
                PanelKind::EditCar => "set FIELD VALUE  save  back".to_string(),
                PanelKind::EditFuel => {
                    if self.fuel_editor.as_ref().is_some_and(FuelEditor::can_delete) {
                        "set FIELD VALUE  toggle partial|missed  save  delete  back".to_string()
                    } else {
                        "set FIELD VALUE  toggle partial|missed  save  back".to_string()
                    }
                }
            },
        };
        FooterInfo { keybindings }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CarDetails, FillUpDetails};

    fn car(id: i64, model: &str) -> Car {
        Car {
            id,
            details: CarDetails {
                year: 2020,
                make: "Honda".to_string(),
                model: model.to_string(),
                purchase_date: "2020-01-01".to_string(),
                purchase_mileage: 10,
            },
        }
    }

    #[test]
    fn starts_on_main_panel() {
        let state = AppState::new(false);
        assert_eq!(state.top_panel(), PanelKind::Main);
        let vm = state.compute_viewmodel();
        assert_eq!(vm.empty_state.unwrap().message, "No cars");
    }

    #[test]
    fn set_cars_refreshes_selected_car() {
        let mut state = AppState::new(false);
        state.selected_car = Some(car(1, "Civic"));
        state.set_cars(vec![car(1, "Accord"), car(2, "Fit")]);
        assert_eq!(state.selected_car.unwrap().details.model, "Accord");
    }

    #[test]
    fn fill_ups_for_other_car_are_ignored() {
        let mut state = AppState::new(false);
        state.selected_car = Some(car(1, "Civic"));
        let fill_up = FillUp {
            id: 1,
            car_id: 2,
            details: FillUpDetails {
                date: "2024-01-01".to_string(),
                mileage: 1,
                price_per_unit: 1.0,
                quantity: 1.0,
                total: 1.0,
                partial: false,
                missed: false,
            },
        };
        state.set_fill_ups(2, vec![fill_up]);
        assert!(state.fill_ups.is_empty());
    }

    #[test]
    fn empty_car_panel_shows_no_records_tile() {
        let mut state = AppState::new(true);
        state.selected_car = Some(car(1, "Civic"));
        state.navigation.push(PanelKind::Car);

        let vm = state.compute_viewmodel();
        assert_eq!(vm.header.title, "2020 Honda Civic");
        assert_eq!(vm.empty_state.unwrap().message, "No records");
    }
}
