//! Session state aggregate and the snapshot handed to renderers

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    catalog::ExerciseDefinition,
    controller::PendingDecision,
    units::Unit,
};

/// Most persistence errors kept in the state at once
pub const MAX_ERRORS: usize = 20;

/// Top-level widget mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Selection,
    Active,
    Settings,
}

/// Phase inside an active session; meaningful only in `Mode::Active`
/// (and remembered while `Mode::Settings` is open on top of a session)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActiveSubMode {
    Effort,
    Rest,
}

/// One-shot message for the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    SessionComplete { exercise: String, sets: u32 },
}

/// The single mutable aggregate owned by the session controller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub mode: Mode,
    pub active_sub_mode: ActiveSubMode,
    /// Mode `Settings` was opened from
    pub return_mode: Option<Mode>,
    pub current_exercise: Option<ExerciseDefinition>,

    pub current_set: u32,
    pub target_sets: u32,
    pub target_reps: u32,
    pub target_weight: f64,
    pub current_reps: u32,
    pub current_weight: f64,

    pub rest_duration_seconds: u32,
    pub rest_remaining_seconds: u32,
    pub stopwatch_seconds: u64,
    pub stopwatch_running: bool,

    pub unit: Unit,
    pub notice: Option<Notice>,
    /// Persistence failures for renderer visibility
    pub errors: Vec<String>,
}

impl SessionState {
    /// Create an idle state on the selection screen
    pub fn new(rest_duration_seconds: u32, unit: Unit) -> Self {
        Self {
            mode: Mode::Selection,
            active_sub_mode: ActiveSubMode::Effort,
            return_mode: None,
            current_exercise: None,
            current_set: 1,
            target_sets: 1,
            target_reps: 0,
            target_weight: 0.0,
            current_reps: 0,
            current_weight: 0.0,
            rest_duration_seconds,
            rest_remaining_seconds: rest_duration_seconds,
            stopwatch_seconds: 0,
            stopwatch_running: false,
            unit,
            notice: None,
            errors: Vec::new(),
        }
    }

    /// Seed a fresh session from an exercise's defaults
    pub fn begin(&mut self, exercise: ExerciseDefinition) {
        self.mode = Mode::Active;
        self.active_sub_mode = ActiveSubMode::Effort;
        self.return_mode = None;
        self.current_set = 1;
        self.target_sets = exercise.default_sets;
        self.target_reps = exercise.default_reps;
        self.target_weight = exercise.default_weight;
        self.current_reps = 0;
        self.current_weight = exercise.default_weight;
        self.rest_remaining_seconds = self.rest_duration_seconds;
        self.stopwatch_seconds = 0;
        self.stopwatch_running = false;
        self.notice = None;
        self.current_exercise = Some(exercise);
    }

    /// Drop session-local values and go back to the selection screen.
    /// Rest duration, unit, notice and errors outlive the session.
    pub fn reset_to_selection(&mut self) {
        let notice = self.notice.take();
        let errors = std::mem::take(&mut self.errors);
        *self = Self::new(self.rest_duration_seconds, self.unit);
        self.notice = notice;
        self.errors = errors;
    }

    pub fn is_effort(&self) -> bool {
        self.mode == Mode::Active && self.active_sub_mode == ActiveSubMode::Effort
    }

    pub fn is_resting(&self) -> bool {
        self.mode == Mode::Active && self.active_sub_mode == ActiveSubMode::Rest
    }

    pub fn stopwatch_allowed(&self) -> bool {
        self.current_exercise
            .as_ref()
            .map(|e| e.stopwatch_enabled)
            .unwrap_or(false)
    }

    /// Add an error to the state, dropping the oldest past [`MAX_ERRORS`]
    pub fn add_error(&mut self, error: String) {
        tracing::warn!("Adding error to state: {}", error);
        self.errors.push(error);
        if self.errors.len() > MAX_ERRORS {
            let excess = self.errors.len() - MAX_ERRORS;
            self.errors.drain(..excess);
        }
    }

    /// Set number shown as "up next" while resting
    pub fn up_next_set(&self) -> Option<u32> {
        (self.active_sub_mode == ActiveSubMode::Rest && self.mode != Mode::Selection)
            .then(|| self.current_set + 1)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            Mode::Selection => f.write_str("Selection"),
            Mode::Settings => f.write_str("Settings"),
            Mode::Active => match self.active_sub_mode {
                ActiveSubMode::Effort => f.write_str("Active.Effort"),
                ActiveSubMode::Rest => f.write_str("Active.Rest"),
            },
        }
    }
}

/// Format seconds as `m:ss`
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Read-only view of the session and catalog for renderers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(flatten)]
    pub session: SessionState,
    pub rest_clock: String,
    pub up_next_set: Option<u32>,
    pub pending: Option<PendingDecision>,
    pub exercises: Vec<ExerciseDefinition>,
}

impl Snapshot {
    pub fn new(
        session: &SessionState,
        pending: Option<&PendingDecision>,
        exercises: &[ExerciseDefinition],
    ) -> Self {
        Self {
            rest_clock: format_clock(session.rest_remaining_seconds),
            up_next_set: session.up_next_set(),
            session: session.clone(),
            pending: pending.cloned(),
            exercises: exercises.to_vec(),
        }
    }
}
