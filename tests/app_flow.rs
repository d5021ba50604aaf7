//! End-to-end flows: events through the app state machine, requests through
//! the worker, records in a JSON store on disk.

use fuel_tracker::app::{CarField, FuelField, FuelFlag, PanelKind};
use fuel_tracker::worker::FuelTrackerWorker;
use fuel_tracker::{handle_event, initialize, Action, AppState, Config, Event, StorageBackend};
use std::path::Path;

struct Harness {
    state: AppState,
    worker: FuelTrackerWorker,
}

impl Harness {
    fn new(data_dir: &Path) -> Self {
        let config = Config {
            data_dir: Some(data_dir.to_path_buf()),
            backend: StorageBackend::Json,
            reduced_motion: true,
            trace_level: None,
        };
        let mut harness = Self {
            state: initialize(&config),
            worker: FuelTrackerWorker::new(config),
        };
        if let Action::PostToWorker(message) = harness.state.load_cars() {
            let response = harness.worker.handle_message(message);
            harness.send(Event::WorkerResponse(response));
        }
        harness
    }

    fn send(&mut self, event: Event) {
        let mut queue = vec![event];
        while let Some(event) = queue.pop() {
            let (_, actions) = handle_event(&mut self.state, &event).unwrap();
            for action in actions {
                if let Action::PostToWorker(message) = action {
                    queue.push(Event::WorkerResponse(self.worker.handle_message(message)));
                }
            }
        }
    }

    fn add_car(&mut self, year: &str, make: &str, model: &str) {
        self.send(Event::AddCar);
        for (field, value) in [
            (CarField::Year, year),
            (CarField::Make, make),
            (CarField::Model, model),
            (CarField::PurchaseDate, "2021-06-01"),
            (CarField::PurchaseMileage, "10"),
        ] {
            self.send(Event::SetCarField(field, value.to_string()));
        }
        self.send(Event::Save);
    }

    fn add_fill_up(&mut self, mileage: &str, price: &str, quantity: &str) {
        self.send(Event::AddFillUp);
        self.send(Event::SetFuelField(FuelField::Mileage, mileage.to_string()));
        self.send(Event::SetFuelField(FuelField::Price, price.to_string()));
        self.send(Event::SetFuelField(FuelField::Quantity, quantity.to_string()));
        self.send(Event::Save);
    }

    fn dialog_message(&self) -> Option<String> {
        self.state.dialogs.top().map(|d| d.message.clone())
    }
}

#[test]
fn cars_and_fill_ups_persist_in_display_order() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut app = Harness::new(dir.path());
        app.add_car("2015", "Mazda", "3");
        app.add_car("2020", "Subaru", "Outback");
        assert_eq!(app.state.top_panel(), PanelKind::Main);

        let labels: Vec<String> = app.state.cars.iter().map(|c| c.details.label()).collect();
        assert_eq!(labels, vec!["2020 Subaru Outback", "2015 Mazda 3"]);

        app.send(Event::SelectCar(1));
        assert_eq!(app.state.top_panel(), PanelKind::Car);
        assert!(app.state.fill_ups.is_empty());
        assert_eq!(
            app.state.compute_viewmodel().empty_state.map(|e| e.message),
            Some("No records".to_string())
        );

        app.add_fill_up("1200", "1.5", "40");
        app.add_fill_up("1800", "1.6", "35");
        assert_eq!(app.state.top_panel(), PanelKind::Car);
    }

    let mut app = Harness::new(dir.path());
    assert_eq!(app.state.cars.len(), 2);
    app.send(Event::SelectCar(1));

    let fill_ups = &app.state.fill_ups;
    assert_eq!(fill_ups.len(), 2);
    assert_eq!(fill_ups[0].details.mileage, 1800);
    assert_eq!(fill_ups[1].details.mileage, 1200);
    assert!((fill_ups[1].details.total - 60.0).abs() < 1e-9);
}

#[test]
fn deleting_a_car_cascades_and_returns_to_the_list() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = Harness::new(dir.path());
    app.add_car("2012", "Volvo", "V70");
    app.send(Event::SelectCar(0));
    app.add_fill_up("100", "1.2", "30");
    app.add_fill_up("400", "1.3", "32");

    app.send(Event::DeleteCar);
    assert_eq!(
        app.dialog_message().as_deref(),
        Some("Are you sure you want to delete your 2012 Volvo V70?")
    );

    app.send(Event::DialogResult(true));
    assert!(app.state.cars.is_empty());
    assert_eq!(app.state.top_panel(), PanelKind::Main);
    assert!(app.state.dialogs.is_empty());

    let reopened = Harness::new(dir.path());
    assert!(reopened.state.cars.is_empty());
}

#[test]
fn editing_a_fill_up_keeps_flags_and_can_delete_it() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = Harness::new(dir.path());
    app.add_car("2019", "Honda", "Jazz");
    app.send(Event::SelectCar(0));
    app.add_fill_up("500", "1.7", "20");

    app.send(Event::SelectFillUp(0));
    assert_eq!(app.state.top_panel(), PanelKind::EditFuel);
    app.send(Event::ToggleFuelFlag(FuelFlag::Partial));
    app.send(Event::Save);
    assert!(app.state.fill_ups[0].details.partial);

    app.send(Event::SelectFillUp(0));
    app.send(Event::DeleteFillUp);
    assert_eq!(
        app.dialog_message().as_deref(),
        Some("Are you sure you want to delete this fuel record?")
    );
    app.send(Event::DialogResult(true));
    assert!(app.state.fill_ups.is_empty());
    assert_eq!(app.state.top_panel(), PanelKind::Car);
}

#[test]
fn invalid_draft_stays_open_with_an_alert() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = Harness::new(dir.path());

    app.send(Event::AddCar);
    app.send(Event::SetCarField(CarField::Make, "Fiat".to_string()));
    app.send(Event::Save);

    assert_eq!(app.state.top_panel(), PanelKind::EditCar);
    assert!(app.dialog_message().is_some());

    app.send(Event::DialogResult(true));
    assert!(app.state.dialogs.is_empty());
    assert!(app.state.cars.is_empty());
}

#[test]
fn storage_failure_can_be_retried() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"not a directory").unwrap();

    let mut app = Harness::new(&blocker.join("data"));
    let message = app.dialog_message().unwrap();
    assert!(message.starts_with("load cars: "), "unexpected dialog: {message}");
    assert!(message.ends_with("Retry?"));

    // Still blocked: retrying the load fails the same way.
    app.send(Event::DialogResult(true));
    assert!(app.dialog_message().unwrap().ends_with("Retry?"));
    app.send(Event::DialogResult(false));

    app.add_car("2008", "Skoda", "Octavia");
    let message = app.dialog_message().unwrap();
    assert!(message.ends_with("Retry?"), "unexpected dialog: {message}");
    assert_eq!(app.state.top_panel(), PanelKind::EditCar);

    std::fs::remove_file(&blocker).unwrap();
    app.send(Event::DialogResult(true));

    assert!(app.state.dialogs.is_empty());
    assert_eq!(app.state.cars.len(), 1);
    assert_eq!(app.state.top_panel(), PanelKind::Main);
    assert!(blocker.join("data").join("fueltracker.json").exists());
}
