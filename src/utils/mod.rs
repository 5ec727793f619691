//! Utility functions module
//!
//! Process-level helpers that sit outside the session core.

pub mod signals;

pub use signals::shutdown_signal;
