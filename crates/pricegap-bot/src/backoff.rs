//! Consecutive-failure backoff for the polling loop.

use std::time::Duration;
use tracing::debug;

/// Counts consecutive failures and decides when the loop must pause.
///
/// Any successful fetch, a cycle without failures, or a completed pause
/// resets the count.
#[derive(Debug, Clone)]
pub struct ErrorCounter {
    consecutive_errors: u32,
    max_errors: u32,
    pause: Duration,
}

impl ErrorCounter {
    pub fn new(max_errors: u32, pause_seconds: u64) -> Self {
        Self {
            consecutive_errors: 0,
            max_errors: max_errors.max(1),
            pause: Duration::from_secs(pause_seconds),
        }
    }

    pub fn consecutive_errors(&self) -> u32 {
        self.consecutive_errors
    }

    pub fn max_errors(&self) -> u32 {
        self.max_errors
    }

    pub fn pause_duration(&self) -> Duration {
        self.pause
    }

    /// Record one failure and return the new count.
    pub fn record_failure(&mut self) -> u32 {
        self.consecutive_errors = self.consecutive_errors.saturating_add(1);
        debug!(
            count = self.consecutive_errors,
            max = self.max_errors,
            "Consecutive error count"
        );
        self.consecutive_errors
    }

    /// Record a success.
    pub fn record_success(&mut self) {
        self.reset();
    }

    pub fn reset(&mut self) {
        if self.consecutive_errors > 0 {
            debug!(previous_count = self.consecutive_errors, "Consecutive errors reset");
        }
        self.consecutive_errors = 0;
    }

    /// True once `max_errors` consecutive failures have been recorded.
    pub fn should_pause(&self) -> bool {
        self.consecutive_errors >= self.max_errors
    }
}
