//! Background tasks module
//!
//! This module contains the tasks that run alongside the HTTP server: tick
//! streams for the session timers and the loop that applies their ticks.

pub mod command_loop;
pub mod ticker;

// Re-export main items
pub use command_loop::command_loop;
pub use ticker::{tick_task, ManualTicker, TickerCall, Ticker, TokioTicker};
