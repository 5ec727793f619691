//! Workout Session - the state machine behind a single-user set and rest timer widget
//!
//! This library tracks which exercise is in progress, advances between sets
//! and rest periods, runs the rest countdown and optional stopwatch, keeps the
//! exercise catalog in sync with the session, and converts weight units. An
//! HTTP layer exposes it to whatever renders the widget.

pub mod api;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod error;
pub mod numeric;
pub mod state;
pub mod storage;
pub mod tasks;
pub mod units;
pub mod utils;

// Re-export commonly used types
pub use catalog::{ExerciseCatalog, ExerciseDefinition, NewExercise};
pub use config::Config;
pub use controller::{Command, Outcome, PendingDecision, SessionController, SettingsForm};
pub use state::{AppState, Snapshot};
pub use api::create_router;
pub use units::Unit;
pub use utils::signals::shutdown_signal;
