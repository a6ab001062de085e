use std::time::Duration;

use crate::metrics::{accuracy, minutes, wpm};
use crate::util::format_clock;

/// Coaching tier picked from the final speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Elite,
    Fast,
    Improving,
    Beginner,
}

impl Feedback {
    pub fn for_wpm(wpm: u32) -> Self {
        if wpm >= 100 {
            Feedback::Elite
        } else if wpm >= 70 {
            Feedback::Fast
        } else if wpm >= 40 {
            Feedback::Improving
        } else {
            Feedback::Beginner
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Feedback::Elite => "Excellent work! You're in the top tier of typists!",
            Feedback::Fast => "Great job! You're typing faster than most people!",
            Feedback::Improving => "Good progress! Keep practicing to improve further!",
            Feedback::Beginner => {
                "Keep practicing! Focus on accuracy first, then speed will follow!"
            }
        }
    }
}

/// Message shown when a session completes.
pub fn completion_message(wpm: u32, accuracy: u32) -> String {
    format!(
        "Test completed! Your typing speed: {wpm} WPM with {accuracy}% accuracy. {}",
        Feedback::for_wpm(wpm).message()
    )
}

/// Snapshot of a session's performance, scored with the live rules.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceReport {
    pub wpm: u32,
    pub accuracy: u32,
    pub total_errors: usize,
    pub chars_typed: usize,
    pub elapsed: Duration,
    /// Errors per typed character, 0 when nothing was typed.
    pub error_rate: f64,
}

impl PerformanceReport {
    pub fn new(chars_typed: usize, total_errors: usize, elapsed: Duration) -> Self {
        let error_rate = if chars_typed == 0 {
            0.0
        } else {
            total_errors as f64 / chars_typed as f64
        };
        Self {
            wpm: wpm(chars_typed, minutes(elapsed)),
            accuracy: accuracy(chars_typed, total_errors),
            total_errors,
            chars_typed,
            elapsed,
            error_rate,
        }
    }

    pub fn summary(&self) -> String {
        format!("WPM: {}, Accuracy: {}%", self.wpm, self.accuracy)
    }

    pub fn elapsed_display(&self) -> String {
        let secs = u32::try_from(self.elapsed.as_secs()).unwrap_or(u32::MAX);
        format_clock(secs)
    }

    pub fn error_rate_display(&self) -> String {
        format!("{:.2}%", self.error_rate * 100.0)
    }
}
