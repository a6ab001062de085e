use std::time::Duration;

use crate::clock::SessionClock;
use crate::comparator::{classify, truncate_chars};
use crate::error::{Error, Result};
use crate::events::{FinalReport, Progress, SessionObserver};
use crate::metrics::Metrics;
use crate::report::PerformanceReport;
use crate::runtime::{Clock, Scheduler, TimerHandle};
use crate::session::{FinishReason, SessionState, SessionStatus};

/// A timed attempt at reproducing a reference text.
///
/// Owns its state exclusively; all mutation goes through the trigger methods
/// (`start`, `on_input`, `on_tick`, `on_clock_expired`, `stop`). Triggers that
/// arrive while no session is running are dropped. Every path that ends a
/// session goes through a single finalize step that runs once per session, so
/// racing end triggers produce one [`FinalReport`].
#[derive(Debug)]
pub struct TypingSession<C: Clock, S: Scheduler, O: SessionObserver> {
    clock: C,
    scheduler: S,
    observer: O,
    state: SessionState,
}

impl<C: Clock, S: Scheduler, O: SessionObserver> TypingSession<C, S, O> {
    pub fn new(clock: C, scheduler: S, observer: O) -> Self {
        Self {
            clock,
            scheduler,
            observer,
            state: SessionState::default(),
        }
    }

    /// Begins a new attempt. Rejected without touching state if the reference
    /// is empty, the limit is zero, or a session is still running.
    pub fn start(&mut self, reference: impl Into<String>, time_limit_secs: u32) -> Result<()> {
        let reference = reference.into();
        if reference.is_empty() {
            return Err(Error::EmptyReference);
        }
        if time_limit_secs == 0 {
            return Err(Error::InvalidTimeLimit {
                seconds: time_limit_secs,
            });
        }
        if self.state.is_running() {
            return Err(Error::SessionActive);
        }

        let mut state = SessionState::running(reference, time_limit_secs, self.clock.now());
        state.clock.start(&mut self.scheduler);
        tracing::info!(
            reference_len = state.reference_len,
            time_limit_secs,
            "typing session started"
        );
        self.state = state;
        Ok(())
    }

    /// Scores the full current contents of the input field.
    ///
    /// Timer firings that fell due before this input are delivered first, so
    /// a steady stream of keystrokes cannot hold the countdown back; if they
    /// expire the session, the input is dropped and the expiry report returned.
    ///
    /// Input past the end of the reference is ignored. Returns the final
    /// report if this input completed the text.
    pub fn on_input(&mut self, typed: &str) -> Option<FinalReport> {
        if !self.state.is_running() {
            tracing::debug!(status = ?self.state.status, "input ignored");
            return None;
        }
        if let Some(expired) = self.pump() {
            tracing::debug!("input arrived after the time limit");
            return Some(expired);
        }

        let within = truncate_chars(typed, self.state.reference_len);
        let comparison = classify(&self.state.reference, within);
        self.state.typed_length = comparison.typed_len;
        self.state.error_count = comparison.error_count;

        let progress = Progress {
            metrics: self.live_metrics(),
            typed_length: comparison.typed_len,
            error_count: comparison.error_count,
            completion: self.state.completion(),
            classifications: comparison.states,
        };
        self.observer.on_progress(&progress);

        if typed == self.state.reference {
            return self.finalize(FinishReason::Completed);
        }
        None
    }

    /// Delivers one firing of a timer. Firings of timers this session no
    /// longer owns are dropped.
    pub fn on_tick(&mut self, handle: TimerHandle) -> Option<FinalReport> {
        if !self.state.is_running() || !self.state.clock.owns(handle) {
            tracing::debug!(?handle, "stale timer tick ignored");
            return None;
        }

        let tick = self.state.clock.tick()?;
        self.observer.on_timer_tick(&tick.update);
        if tick.expired {
            return self.on_clock_expired();
        }
        None
    }

    /// Drains every due timer firing from the scheduler.
    pub fn pump(&mut self) -> Option<FinalReport> {
        let mut report = None;
        for handle in self.scheduler.due() {
            if let Some(finished) = self.on_tick(handle) {
                report = Some(finished);
            }
        }
        report
    }

    pub fn on_clock_expired(&mut self) -> Option<FinalReport> {
        self.finalize(FinishReason::TimeExpired)
    }

    pub fn stop(&mut self) -> Option<FinalReport> {
        self.finalize(FinishReason::Stopped)
    }

    /// Discards the current session and returns to idle without reporting.
    pub fn reset(&mut self) {
        self.state.clock.stop(&mut self.scheduler);
        let time_limit = self.state.time_limit_seconds();
        self.state = SessionState::default();
        self.state.clock = SessionClock::new(time_limit);
        tracing::debug!("session reset to idle");
    }

    fn finalize(&mut self, reason: FinishReason) -> Option<FinalReport> {
        if !self.state.is_running() {
            tracing::debug!(%reason, status = ?self.state.status, "end trigger ignored");
            return None;
        }

        self.state.clock.stop(&mut self.scheduler);
        self.state.status = SessionStatus::Finished;
        self.state.ended_at = Some(self.clock.now());
        self.state.finish_reason = Some(reason);

        let elapsed = self.elapsed();
        let report = FinalReport {
            metrics: Metrics::final_report(
                self.state.typed_length,
                self.state.error_count,
                elapsed,
            ),
            reason,
            typed_length: self.state.typed_length,
            error_count: self.state.error_count,
            elapsed,
        };
        tracing::info!(
            %reason,
            wpm = report.metrics.wpm,
            accuracy = report.metrics.accuracy,
            "typing session finished"
        );
        self.observer.on_finished(&report);
        Some(report)
    }

    /// Wall-clock time since start, frozen once the session ends.
    pub fn elapsed(&self) -> Duration {
        let Some(started_at) = self.state.started_at else {
            return Duration::ZERO;
        };
        let end = self.state.ended_at.unwrap_or_else(|| self.clock.now());
        end.saturating_duration_since(started_at)
    }

    pub fn live_metrics(&self) -> Metrics {
        Metrics::live(
            self.state.typed_length,
            self.state.error_count,
            self.elapsed(),
        )
    }

    pub fn performance_report(&self) -> PerformanceReport {
        PerformanceReport::new(
            self.state.typed_length,
            self.state.error_count,
            self.elapsed(),
        )
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn status(&self) -> SessionStatus {
        self.state.status
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }
}
