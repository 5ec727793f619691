//! Timer slots for the rest countdown and the stopwatch
//!
//! Each slot holds the token of the tick stream currently allowed to mutate
//! the session. Re-arming a slot issues a new token, so ticks still in flight
//! from an older stream no longer match and are dropped.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerKind {
    Rest,
    Stopwatch,
}

/// Identity of one scheduled tick stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerToken(u64);

/// Live tokens per timer kind
#[derive(Debug, Clone, Default)]
pub struct TimerState {
    rest: Option<TimerToken>,
    stopwatch: Option<TimerToken>,
    issued: u64,
}

impl TimerState {
    /// Create timer slots with nothing armed
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a slot with a fresh token, replacing any previous one
    pub fn arm(&mut self, kind: TimerKind) -> TimerToken {
        self.issued += 1;
        let token = TimerToken(self.issued);
        *self.slot_mut(kind) = Some(token);
        token
    }

    /// Disarm a slot, returning the token that was live
    pub fn disarm(&mut self, kind: TimerKind) -> Option<TimerToken> {
        self.slot_mut(kind).take()
    }

    /// Check whether a tick carrying `token` may still act
    pub fn is_live(&self, kind: TimerKind, token: TimerToken) -> bool {
        self.token(kind) == Some(token)
    }

    pub fn is_active(&self, kind: TimerKind) -> bool {
        self.token(kind).is_some()
    }

    pub fn token(&self, kind: TimerKind) -> Option<TimerToken> {
        match kind {
            TimerKind::Rest => self.rest,
            TimerKind::Stopwatch => self.stopwatch,
        }
    }

    fn slot_mut(&mut self, kind: TimerKind) -> &mut Option<TimerToken> {
        match kind {
            TimerKind::Rest => &mut self.rest,
            TimerKind::Stopwatch => &mut self.stopwatch,
        }
    }
}
