//! Main application state management

use std::{
    sync::{Mutex, MutexGuard},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::{Snapshot, TimerKind};
use crate::{
    controller::{Command, Outcome, SessionController},
    error::DispatchError,
};

/// Result of a dispatched command
#[derive(Debug, Clone)]
pub struct Dispatched {
    pub outcome: Outcome,
    pub snapshot: Snapshot,
}

/// Shared state: the session controller plus render notifications
#[derive(Debug)]
pub struct AppState {
    /// Single writer for the session; every mutation takes this lock
    controller: Mutex<SessionController>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Channel carrying the latest snapshot to renderers
    pub snapshot_tx: watch::Sender<Snapshot>,
    /// Keep the receiver alive to prevent channel closure
    pub _snapshot_rx: watch::Receiver<Snapshot>,
}

impl AppState {
    /// Wrap a controller for shared use
    pub fn new(controller: SessionController, port: u16, host: String) -> Self {
        let (snapshot_tx, snapshot_rx) = watch::channel(controller.snapshot());

        Self {
            controller: Mutex::new(controller),
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            snapshot_tx,
            _snapshot_rx: snapshot_rx,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, SessionController>, DispatchError> {
        self.controller
            .lock()
            .map_err(|e| DispatchError::Lock(format!("Failed to lock session controller: {}", e)))
    }

    /// Apply a command and notify renderers if anything changed
    pub fn dispatch(&self, command: Command) -> Result<Dispatched, DispatchError> {
        let action = command.name();
        let is_tick = command.is_tick();

        let mut controller = self.lock()?;
        let outcome = controller.apply(command);
        let snapshot = controller.snapshot();
        drop(controller); // Release the lock early

        let outcome = outcome?;

        if !is_tick {
            info!("{} -> {:?}", action, outcome);
            if let Ok(mut last_action) = self.last_action.lock() {
                *last_action = Some(action.to_string());
            }
            if let Ok(mut last_time) = self.last_action_time.lock() {
                *last_time = Some(Utc::now());
            }
        }

        if outcome != Outcome::Ignored {
            // send_replace never fails, even with no subscribers
            self.snapshot_tx.send_replace(snapshot.clone());
        } else {
            debug!("{} changed nothing, skipping render notification", action);
        }

        Ok(Dispatched { outcome, snapshot })
    }

    /// Get the current snapshot
    pub fn snapshot(&self) -> Result<Snapshot, DispatchError> {
        Ok(self.lock()?.snapshot())
    }

    /// Check whether a timer stream is currently live
    pub fn timer_active(&self, kind: TimerKind) -> Result<bool, DispatchError> {
        Ok(self.lock()?.timers().is_active(kind))
    }

    /// Subscribe to render notifications
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

impl Drop for AppState {
    fn drop(&mut self) {
        match self.controller.get_mut() {
            Ok(controller) => info!("Shutting down in {}", controller.state()),
            Err(e) => warn!("Controller lock poisoned at shutdown: {}", e),
        }
    }
}
