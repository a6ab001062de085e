//! Notifications the session pushes to the presentation layer.
//!
//! Observers are called synchronously from inside the triggering call.
use std::time::Duration;

use serde::Serialize;

use crate::comparator::CharState;
use crate::metrics::Metrics;
use crate::session::FinishReason;

/// Snapshot after an input event.
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    pub classifications: Vec<CharState>,
    pub metrics: Metrics,
    pub typed_length: usize,
    pub error_count: usize,
    /// Share of the reference typed so far, in `[0, 1]`.
    pub completion: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimerUpdate {
    pub remaining_seconds: u32,
    pub progress: f64,
}

/// Emitted once per session when it finishes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalReport {
    pub metrics: Metrics,
    pub reason: FinishReason,
    pub typed_length: usize,
    pub error_count: usize,
    pub elapsed: Duration,
}

pub trait SessionObserver {
    fn on_progress(&mut self, _progress: &Progress) {}
    fn on_timer_tick(&mut self, _update: &TimerUpdate) {}
    fn on_finished(&mut self, _report: &FinalReport) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl SessionObserver for NullObserver {}

#[derive(Debug, Clone, PartialEq)]
pub enum ObservedEvent {
    Progress(Progress),
    TimerTick(TimerUpdate),
    Finished(FinalReport),
}

/// Observer that records every notification in order.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Vec<ObservedEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[ObservedEvent] {
        &self.events
    }

    pub fn finished(&self) -> Vec<&FinalReport> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ObservedEvent::Finished(report) => Some(report),
                _ => None,
            })
            .collect()
    }

    pub fn timer_ticks(&self) -> Vec<&TimerUpdate> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ObservedEvent::TimerTick(update) => Some(update),
                _ => None,
            })
            .collect()
    }

    pub fn last_progress(&self) -> Option<&Progress> {
        self.events.iter().rev().find_map(|e| match e {
            ObservedEvent::Progress(progress) => Some(progress),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl SessionObserver for EventLog {
    fn on_progress(&mut self, progress: &Progress) {
        self.events.push(ObservedEvent::Progress(progress.clone()));
    }

    fn on_timer_tick(&mut self, update: &TimerUpdate) {
        self.events.push(ObservedEvent::TimerTick(*update));
    }

    fn on_finished(&mut self, report: &FinalReport) {
        self.events.push(ObservedEvent::Finished(report.clone()));
    }
}
