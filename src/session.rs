use std::time::Instant;

use serde::Serialize;

use crate::clock::SessionClock;

pub const DEFAULT_TIME_LIMIT_SECS: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Running,
    Finished,
}

/// Which trigger ended a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Completed,
    TimeExpired,
    Stopped,
}

#[derive(Debug, Clone)]
pub struct SessionState {
    pub status: SessionStatus,
    pub reference: String,
    pub reference_len: usize,
    pub typed_length: usize,
    pub error_count: usize,
    pub started_at: Option<Instant>,
    pub ended_at: Option<Instant>,
    pub clock: SessionClock,
    pub finish_reason: Option<FinishReason>,
}

impl SessionState {
    /// Fresh state for a new attempt at `reference`.
    pub fn running(reference: String, time_limit_secs: u32, started_at: Instant) -> Self {
        let reference_len = reference.chars().count();
        Self {
            status: SessionStatus::Running,
            reference,
            reference_len,
            typed_length: 0,
            error_count: 0,
            started_at: Some(started_at),
            ended_at: None,
            clock: SessionClock::new(time_limit_secs),
            finish_reason: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == SessionStatus::Running
    }

    pub fn time_limit_seconds(&self) -> u32 {
        self.clock.time_limit_secs()
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.clock.remaining_secs()
    }

    /// Share of the reference typed so far.
    pub fn completion(&self) -> f64 {
        if self.reference_len == 0 {
            return 0.0;
        }
        (self.typed_length as f64 / self.reference_len as f64).min(1.0)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            status: SessionStatus::Idle,
            reference: String::new(),
            reference_len: 0,
            typed_length: 0,
            error_count: 0,
            started_at: None,
            ended_at: None,
            clock: SessionClock::new(DEFAULT_TIME_LIMIT_SECS),
            finish_reason: None,
        }
    }
}
