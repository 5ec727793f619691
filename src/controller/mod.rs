//! Session controller module
//!
//! The controller owns the session state and is the only code allowed to
//! mutate it. Renderer callbacks and timer ticks both arrive as [`Command`]s.

pub mod command;
pub mod session_controller;

#[cfg(test)]
mod tests;

// Re-export main types
pub use command::{Command, Outcome, PendingDecision, SettingsForm};
pub use session_controller::{SessionController, REPS_STEP, WEIGHT_STEP};
