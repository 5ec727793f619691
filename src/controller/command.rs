//! Commands accepted by the session controller and their outcomes

use serde::{Deserialize, Serialize};

use crate::{
    catalog::{self, NewExercise},
    error::ValidationError,
    state::{SessionState, TimerKind, TimerToken},
    units::Unit,
};

/// Every mutation of the session goes through one of these
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SelectExercise { id: String },
    AdjustReps { delta: i64 },
    AdjustWeight { delta: f64 },
    SetReps { input: String },
    SetWeight { input: String },
    CompleteSet,
    AdjustRestTimer { seconds: i64 },
    FinishRest,
    RequestReturnToSelection,
    ToggleStopwatch,
    OpenSettings,
    SaveSettings(SettingsForm),
    CancelSettings,
    RequestRename { name: String },
    AddExercise(NewExercise),
    RequestRemove { id: String },
    Confirm,
    Cancel,
    DismissNotice,
    ClearErrors,
    Tick { kind: TimerKind, token: TimerToken },
}

impl Command {
    /// Short name used for logging and last-action tracking
    pub fn name(&self) -> &'static str {
        match self {
            Command::SelectExercise { .. } => "select_exercise",
            Command::AdjustReps { .. } => "adjust_reps",
            Command::AdjustWeight { .. } => "adjust_weight",
            Command::SetReps { .. } => "set_reps",
            Command::SetWeight { .. } => "set_weight",
            Command::CompleteSet => "complete_set",
            Command::AdjustRestTimer { .. } => "adjust_rest_timer",
            Command::FinishRest => "finish_rest",
            Command::RequestReturnToSelection => "request_return_to_selection",
            Command::ToggleStopwatch => "toggle_stopwatch",
            Command::OpenSettings => "open_settings",
            Command::SaveSettings(_) => "save_settings",
            Command::CancelSettings => "cancel_settings",
            Command::RequestRename { .. } => "request_rename",
            Command::AddExercise(_) => "add_exercise",
            Command::RequestRemove { .. } => "request_remove",
            Command::Confirm => "confirm",
            Command::Cancel => "cancel",
            Command::DismissNotice => "dismiss_notice",
            Command::ClearErrors => "clear_errors",
            Command::Tick { .. } => "tick",
        }
    }

    pub fn is_tick(&self) -> bool {
        matches!(self, Command::Tick { .. })
    }
}

/// Destructive or renaming action waiting for a yes/no answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PendingDecision {
    /// Abandon a session that already has completed sets
    EndSession,
    Rename { name: String },
    RemoveExercise { id: String, name: String },
}

/// What a command did
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Applied,
    /// The command was a no-op (clamped input, stale tick, unchanged value)
    Ignored,
    AwaitingConfirmation(PendingDecision),
}

/// Values submitted from the settings panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsForm {
    pub sets: u32,
    pub reps: u32,
    pub weight: f64,
    pub rest_seconds: u32,
    pub unit: Unit,
    #[serde(default)]
    pub stopwatch_enabled: bool,
}

impl SettingsForm {
    /// Prefill the form from the running session
    pub fn from_state(state: &SessionState) -> Self {
        Self {
            sets: state.target_sets,
            reps: state.target_reps,
            weight: state.target_weight,
            rest_seconds: state.rest_duration_seconds,
            unit: state.unit,
            stopwatch_enabled: state.stopwatch_allowed(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.sets == 0 {
            return Err(ValidationError::NonPositiveSets);
        }
        if self.reps == 0 {
            return Err(ValidationError::NonPositiveReps);
        }
        catalog::validate_weight(self.weight)
    }
}
