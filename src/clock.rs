use std::time::Duration;

use crate::events::TimerUpdate;
use crate::runtime::{Scheduler, TimerHandle};
use crate::util::format_clock;

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// One-second countdown for a session.
///
/// Only drives the visible countdown and the expiry signal; speed metrics use
/// wall-clock time so late ticks don't skew them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClock {
    time_limit_secs: u32,
    remaining_secs: u32,
    handle: Option<TimerHandle>,
    expired: bool,
}

impl SessionClock {
    pub fn new(time_limit_secs: u32) -> Self {
        Self {
            time_limit_secs,
            remaining_secs: time_limit_secs,
            handle: None,
            expired: false,
        }
    }

    /// Resets the countdown and registers a timer that fires once per second
    /// of the limit.
    pub fn start<S: Scheduler>(&mut self, scheduler: &mut S) {
        self.stop(scheduler);
        self.remaining_secs = self.time_limit_secs;
        self.expired = false;
        self.handle = Some(scheduler.schedule_times(TICK_INTERVAL, self.time_limit_secs));
    }

    /// Cancels the timer. Safe to call more than once.
    pub fn stop<S: Scheduler>(&mut self, scheduler: &mut S) {
        if let Some(handle) = self.handle.take() {
            scheduler.cancel(handle);
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub fn owns(&self, handle: TimerHandle) -> bool {
        self.handle == Some(handle)
    }

    pub fn handle(&self) -> Option<TimerHandle> {
        self.handle
    }

    /// Counts down one second. Returns `None` once the clock has expired;
    /// `expired` is set on exactly one returned update.
    pub fn tick(&mut self) -> Option<ClockTick> {
        if self.expired || self.remaining_secs == 0 {
            return None;
        }
        self.remaining_secs -= 1;
        self.expired = self.remaining_secs == 0;
        Some(ClockTick {
            update: self.update(),
            expired: self.expired,
        })
    }

    pub fn update(&self) -> TimerUpdate {
        TimerUpdate {
            remaining_seconds: self.remaining_secs,
            progress: self.progress(),
        }
    }

    pub fn time_limit_secs(&self) -> u32 {
        self.time_limit_secs
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn has_expired(&self) -> bool {
        self.expired
    }

    /// Fraction of the time limit used, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.time_limit_secs == 0 {
            return 0.0;
        }
        let used = self.time_limit_secs - self.remaining_secs;
        f64::from(used) / f64::from(self.time_limit_secs)
    }

    /// Remaining time as `m:ss`.
    pub fn display(&self) -> String {
        format_clock(self.remaining_secs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockTick {
    pub update: TimerUpdate,
    pub expired: bool,
}
