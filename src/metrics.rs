//! Typing speed and accuracy scoring.
//!
//! All functions are total: degenerate inputs map to fixed sentinel values
//! instead of dividing by zero.
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Standard word length used for WPM.
pub const CHARS_PER_WORD: f64 = 5.0;

/// Words per minute for `total_chars_typed` characters over `elapsed_minutes`.
///
/// Returns 0 when no time has elapsed or the result is not a number.
pub fn wpm(total_chars_typed: usize, elapsed_minutes: f64) -> u32 {
    if elapsed_minutes == 0.0 || elapsed_minutes.is_nan() {
        return 0;
    }
    let raw = total_chars_typed as f64 / CHARS_PER_WORD / elapsed_minutes;
    if raw.is_nan() {
        return 0;
    }
    // saturating cast; negative elapsed time clamps to 0
    raw.round() as u32
}

/// Live accuracy percentage. Defaults to 100 before anything is typed.
pub fn accuracy(total_chars_typed: usize, error_count: usize) -> u32 {
    if total_chars_typed == 0 {
        return 100;
    }
    percent_correct(total_chars_typed, error_count)
}

/// Accuracy for the end-of-session report. A session that ends with no input
/// scores 0, unlike the live default of 100.
pub fn final_accuracy(total_chars_typed: usize, error_count: usize) -> u32 {
    if total_chars_typed == 0 {
        return 0;
    }
    percent_correct(total_chars_typed, error_count)
}

fn percent_correct(total: usize, errors: usize) -> u32 {
    let correct = total.saturating_sub(errors);
    ((correct as f64 / total as f64) * 100.0).round() as u32
}

pub fn minutes(elapsed: Duration) -> f64 {
    elapsed.as_secs_f64() / 60.0
}

/// Derived speed/accuracy pair, recomputed from session state on demand.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    pub wpm: u32,
    pub accuracy: u32,
}

impl Metrics {
    pub fn live(total_chars_typed: usize, error_count: usize, elapsed: Duration) -> Self {
        Self {
            wpm: wpm(total_chars_typed, minutes(elapsed)),
            accuracy: accuracy(total_chars_typed, error_count),
        }
    }

    pub fn final_report(total_chars_typed: usize, error_count: usize, elapsed: Duration) -> Self {
        Self {
            wpm: wpm(total_chars_typed, minutes(elapsed)),
            accuracy: final_accuracy(total_chars_typed, error_count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wpm_one_minute() {
        assert_eq!(wpm(50, 1.0), 10);
        assert_eq!(wpm(300, 1.0), 60);
    }

    #[test]
    fn test_wpm_half_minute() {
        assert_eq!(wpm(150, 0.5), 60);
    }

    #[test]
    fn test_wpm_rounds() {
        // 12 chars / 5 = 2.4 words
        assert_eq!(wpm(12, 1.0), 2);
        // 13 chars / 5 = 2.6 words
        assert_eq!(wpm(13, 1.0), 3);
    }

    #[test]
    fn test_wpm_zero_elapsed() {
        assert_eq!(wpm(100, 0.0), 0);
        assert_eq!(wpm(0, 0.0), 0);
    }

    #[test]
    fn test_wpm_nan_elapsed() {
        assert_eq!(wpm(10, f64::NAN), 0);
    }

    #[test]
    fn test_wpm_non_decreasing_in_chars() {
        for elapsed in [0.1, 0.5, 1.0, 2.5] {
            let mut last = 0;
            for chars in 0..500 {
                let current = wpm(chars, elapsed);
                assert!(current >= last, "wpm dropped at {chars} chars");
                last = current;
            }
        }
    }

    #[test]
    fn test_accuracy_defaults_to_100() {
        assert_eq!(accuracy(0, 0), 100);
    }

    #[test]
    fn test_final_accuracy_zero_input() {
        assert_eq!(final_accuracy(0, 0), 0);
    }

    #[test]
    fn test_accuracy_values() {
        assert_eq!(accuracy(4, 1), 75);
        assert_eq!(accuracy(3, 1), 67);
        assert_eq!(accuracy(10, 10), 0);
        assert_eq!(final_accuracy(4, 1), 75);
    }

    #[test]
    fn test_accuracy_bounds() {
        for n in 0..60 {
            for e in 0..=n {
                let live = accuracy(n, e);
                let fin = final_accuracy(n, e);
                assert!(live <= 100);
                assert!(fin <= 100);
            }
        }
    }

    #[test]
    fn test_metrics_live_and_final_differ_only_on_empty() {
        let elapsed = Duration::from_secs(60);
        assert_eq!(
            Metrics::live(0, 0, elapsed),
            Metrics {
                wpm: 0,
                accuracy: 100
            }
        );
        assert_eq!(
            Metrics::final_report(0, 0, elapsed),
            Metrics {
                wpm: 0,
                accuracy: 0
            }
        );
        assert_eq!(
            Metrics::live(50, 5, elapsed),
            Metrics::final_report(50, 5, elapsed)
        );
    }
}
