//! One-second tick streams for the rest countdown and the stopwatch

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, info};

use crate::{
    controller::Command,
    state::{TimerKind, TimerToken},
};

/// Schedules tick streams on behalf of the session controller.
///
/// `start` must replace any running stream of the same kind, so re-entering
/// rest never stacks two countdowns.
pub trait Ticker: Send {
    fn start(&mut self, kind: TimerKind, token: TimerToken);
    fn stop(&mut self, kind: TimerKind);
}

/// Ticker backed by spawned tokio tasks that feed `Command::Tick` into the
/// command channel
#[derive(Debug)]
pub struct TokioTicker {
    tx: mpsc::UnboundedSender<Command>,
    period: Duration,
    handles: HashMap<TimerKind, JoinHandle<()>>,
}

impl TokioTicker {
    pub fn new(tx: mpsc::UnboundedSender<Command>) -> Self {
        Self::with_period(tx, Duration::from_secs(1))
    }

    pub fn with_period(tx: mpsc::UnboundedSender<Command>, period: Duration) -> Self {
        Self {
            tx,
            period,
            handles: HashMap::new(),
        }
    }
}

impl Ticker for TokioTicker {
    fn start(&mut self, kind: TimerKind, token: TimerToken) {
        self.stop(kind);
        let handle = tokio::spawn(tick_task(kind, token, self.period, self.tx.clone()));
        self.handles.insert(kind, handle);
    }

    fn stop(&mut self, kind: TimerKind) {
        if let Some(handle) = self.handles.remove(&kind) {
            debug!("Stopping {:?} ticker", kind);
            handle.abort();
        }
    }
}

impl Drop for TokioTicker {
    fn drop(&mut self) {
        for (_, handle) in self.handles.drain() {
            handle.abort();
        }
    }
}

/// Background task that sends one tick per period until aborted or until
/// the command channel closes
pub async fn tick_task(
    kind: TimerKind,
    token: TimerToken,
    period: Duration,
    tx: mpsc::UnboundedSender<Command>,
) {
    info!("Starting {:?} ticker", kind);

    // First tick one full period after start, not immediately.
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        if tx.send(Command::Tick { kind, token }).is_err() {
            debug!("Command channel closed, {:?} ticker exiting", kind);
            break;
        }
    }
}

/// Call recorded by [`ManualTicker`]
#[derive(Debug, Clone, PartialEq)]
pub enum TickerCall {
    Start(TimerKind, TimerToken),
    Stop(TimerKind),
}

/// Ticker that only records what it was asked to do; ticks are delivered
/// by calling the controller directly
#[derive(Debug, Clone, Default)]
pub struct ManualTicker {
    calls: Arc<Mutex<Vec<TickerCall>>>,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<TickerCall> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    /// Number of `start` calls for `kind`
    pub fn starts(&self, kind: TimerKind) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, TickerCall::Start(k, _) if *k == kind))
            .count()
    }

    fn record(&self, call: TickerCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl Ticker for ManualTicker {
    fn start(&mut self, kind: TimerKind, token: TimerToken) {
        self.record(TickerCall::Start(kind, token));
    }

    fn stop(&mut self, kind: TimerKind) {
        self.record(TickerCall::Stop(kind));
    }
}
