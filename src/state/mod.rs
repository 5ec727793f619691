//! State management module
//!
//! This module contains the session aggregate, the timer slots, and the
//! shared application state that serializes every mutation.

pub mod session_state;
pub mod app_state;
pub mod timer_state;

// Re-export main types
pub use session_state::{format_clock, ActiveSubMode, Mode, Notice, SessionState, Snapshot, MAX_ERRORS};
pub use app_state::{AppState, Dispatched};
pub use timer_state::{TimerKind, TimerState, TimerToken};
