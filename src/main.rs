//! Console runtime and entry point.
//!
//! Reads one command per line from stdin, maps it to a library [`Event`],
//! delegates to `handle_event`, executes the resulting actions, and renders
//! the top panel after each command.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────┐
//! │        Runtime          │
//! │  ┌──────────────────┐   │
//! │  │  AppState        │   │  ← UI state, event handling
//! │  └──────────────────┘   │
//! │          │ JSON         │
//! │          ▼              │
//! │  ┌──────────────────┐   │
//! │  │ FuelTrackerWorker│   │  ← Repositories, record store
//! │  └──────────────────┘   │
//! └─────────────────────────┘
//! ```
//!
//! Requests cross to the worker as serialized [`WorkerMessage`]s and come back
//! as [`WorkerResponse`]s fed in as `Event::WorkerResponse`.
//!
//! # Configuration
//!
//! `<config_dir>/fuel-tracker/config.toml` is read when present; `key=value`
//! arguments override it:
//!
//! ```text
//! fuel-tracker backend=memory reduced_motion=true trace_level=debug
//! ```
//!
//! # Commands
//!
//! Main panel:
//! - `add`: New car
//! - `open N`: Show car `N`
//! - `signin`, `upload`, `download`: Not available yet
//!
//! Car panel:
//! - `add`: New fill-up
//! - `open N`: Edit fill-up `N`
//! - `edit`: Edit the car
//! - `delete`: Delete the car and its fill-ups
//! - `graph`: Not available yet
//!
//! Editors:
//! - `set FIELD VALUE`: Change a field
//! - `toggle partial|missed`: Flip a fill-up flag
//! - `delete`: Delete the fill-up being edited
//! - `save`
//!
//! Anywhere:
//! - `back`, `yes`/`ok`, `no`, `esc`, `help`, `quit`

#![allow(clippy::multiple_crate_versions)]

use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};

use fuel_tracker::app::{AppState, CarField, Feature, FuelField, FuelFlag, PanelKind};
use fuel_tracker::infrastructure::config_file;
use fuel_tracker::worker::{FuelTrackerWorker, WorkerMessage, WorkerResponse};
use fuel_tracker::{handle_event, Action, Config, Event};

const HELP: &str = "\
commands: add | open N | edit | delete | set FIELD VALUE | toggle partial|missed
          save | back | yes | no | esc | signin | upload | download | graph | quit
car fields:  year make model purchase mileage
fuel fields: date mileage price quantity total";

/// Runtime state wrapper.
///
/// Owns the library's `AppState` and the worker, and tracks whether a
/// `Quit` action was executed.
struct Runtime {
    app: AppState,
    worker: FuelTrackerWorker,
    quit: bool,
}

impl Runtime {
    fn new(config: Config) -> Self {
        Self {
            app: fuel_tracker::initialize(&config),
            worker: FuelTrackerWorker::new(config),
            quit: false,
        }
    }

    /// Processes an event and every response it causes.
    ///
    /// Pending transitions are completed before returning so the console
    /// never waits on an animation it cannot show.
    fn dispatch(&mut self, event: Event) -> bool {
        let mut queue = vec![event];
        let mut should_render = false;

        while let Some(event) = queue.pop() {
            let span = tracing::debug_span!("runtime_dispatch", event = ?event);
            let _guard = span.enter();

            match handle_event(&mut self.app, &event) {
                Ok((render, actions)) => {
                    tracing::debug!(action_count = actions.len(), render, "event handled");
                    should_render |= render;
                    for action in &actions {
                        if let Some(response) = self.execute_action(action) {
                            queue.push(Event::WorkerResponse(response));
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "error handling event");
                }
            }

            if queue.is_empty() && self.app.navigation.is_transitioning() {
                queue.push(Event::TransitionEnd);
            }
        }

        should_render
    }

    #[tracing::instrument(level = "debug", skip(self))]
    fn execute_action(&mut self, action: &Action) -> Option<WorkerResponse> {
        match action {
            Action::PostToWorker(message) => self.post_worker_message(message),
            Action::Quit => {
                tracing::debug!("quit requested");
                self.quit = true;
                None
            }
        }
    }

    /// Sends a request across the JSON boundary and decodes the reply.
    fn post_worker_message(&mut self, message: &WorkerMessage) -> Option<WorkerResponse> {
        let payload = match serde_json::to_string(message) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize worker message");
                return None;
            }
        };

        tracing::debug!(payload_len = payload.len(), "posting message to worker");
        let reply = self.worker.handle_payload(&payload);

        match serde_json::from_str(&reply) {
            Ok(response) => Some(response),
            Err(e) => {
                tracing::warn!(error = %e, "failed to deserialize worker response");
                None
            }
        }
    }

    fn render(&self) {
        fuel_tracker::ui::render(&self.app);
    }
}

/// Maps a command line to an event for the panel currently on top.
fn parse_command(line: &str, top: PanelKind) -> Option<Event> {
    let mut words = line.split_whitespace();
    let command = words.next()?.to_ascii_lowercase();

    let event = match (command.as_str(), top) {
        ("add" | "+", PanelKind::Main) => Event::AddCar,
        ("add" | "+", PanelKind::Car) => Event::AddFillUp,
        ("open", PanelKind::Main) => Event::SelectCar(words.next()?.parse().ok()?),
        ("open", PanelKind::Car) => Event::SelectFillUp(words.next()?.parse().ok()?),
        ("edit", PanelKind::Car) => Event::EditCar,
        ("delete", PanelKind::Car) => Event::DeleteCar,
        ("delete", PanelKind::EditFuel) => Event::DeleteFillUp,
        ("set", PanelKind::EditCar) => {
            let field = car_field(words.next()?)?;
            Event::SetCarField(field, words.collect::<Vec<_>>().join(" "))
        }
        ("set", PanelKind::EditFuel) => {
            let field = fuel_field(words.next()?)?;
            Event::SetFuelField(field, words.collect::<Vec<_>>().join(" "))
        }
        ("toggle", PanelKind::EditFuel) => Event::ToggleFuelFlag(match words.next()? {
            "partial" => FuelFlag::Partial,
            "missed" => FuelFlag::Missed,
            _ => return None,
        }),
        ("save", PanelKind::EditCar | PanelKind::EditFuel) => Event::Save,
        ("signin", _) => Event::ComingSoon(Feature::SignIn),
        ("upload", _) => Event::ComingSoon(Feature::Upload),
        ("download", _) => Event::ComingSoon(Feature::Download),
        ("graph", _) => Event::ComingSoon(Feature::Graph),
        ("back", _) => Event::Back,
        ("yes" | "y" | "ok", _) => Event::DialogResult(true),
        ("no" | "n", _) => Event::DialogResult(false),
        ("esc", _) => Event::Escape,
        ("quit" | "q", _) => Event::Quit,
        _ => return None,
    };
    Some(event)
}

fn car_field(name: &str) -> Option<CarField> {
    Some(match name {
        "year" => CarField::Year,
        "make" => CarField::Make,
        "model" => CarField::Model,
        "purchase" | "date" => CarField::PurchaseDate,
        "mileage" => CarField::PurchaseMileage,
        _ => return None,
    })
}

fn fuel_field(name: &str) -> Option<FuelField> {
    Some(match name {
        "date" => FuelField::Date,
        "mileage" => FuelField::Mileage,
        "price" => FuelField::Price,
        "quantity" => FuelField::Quantity,
        "total" => FuelField::Total,
        _ => return None,
    })
}

/// Config file (if any) overlaid with `key=value` arguments.
fn load_config() -> Config {
    let mut config = match config_file().filter(|path| path.exists()) {
        Some(path) => Config::load_file(&path).unwrap_or_else(|e| {
            eprintln!("ignoring config file: {e}");
            Config::default()
        }),
        None => Config::default(),
    };

    let overrides: BTreeMap<String, String> = std::env::args()
        .skip(1)
        .filter_map(|arg| {
            arg.split_once('=')
                .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        })
        .collect();
    config.apply_map(&overrides);
    config
}

fn main() -> io::Result<()> {
    let config = load_config();
    fuel_tracker::observability::init_tracing(&config);

    let span = tracing::debug_span!("runtime_start");
    let guard = span.enter();
    tracing::debug!(?config, "configuration loaded");

    let mut runtime = Runtime::new(config);
    let initial = runtime.app.load_cars();
    if let Some(response) = runtime.execute_action(&initial) {
        runtime.dispatch(Event::WorkerResponse(response));
    }
    drop(guard);

    runtime.render();

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        if line.trim() == "help" {
            println!("{HELP}");
            continue;
        }

        match parse_command(&line, runtime.app.top_panel()) {
            Some(event) => {
                if runtime.dispatch(event) {
                    runtime.render();
                }
            }
            None => println!("? {HELP}"),
        }

        if runtime.quit {
            break;
        }
        stdout.flush()?;
    }

    Ok(())
}
