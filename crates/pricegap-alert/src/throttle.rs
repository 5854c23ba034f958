//! Alert cooldown gate.
//!
//! One throttle per running instance: any dispatched alert restarts the
//! cooldown window for every later opportunity, whichever sources it involves.
//! Time is passed in explicitly so callers and tests control the clock.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

/// Current throttle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleState {
    /// No alert yet, or the cooldown has elapsed.
    Armed,
    /// An alert went out less than `cooldown_seconds` ago.
    Cooling { remaining_secs: i64 },
}

/// Outcome of offering an opportunity to the throttle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleDecision {
    /// Send to the sinks. The cooldown has been restarted.
    Dispatch,
    /// Within cooldown, log only.
    Suppress { remaining_secs: i64 },
}

/// Armed/Cooling state machine guarding alert dispatch.
#[derive(Debug, Clone)]
pub struct AlertThrottle {
    cooldown: Duration,
    last_alert_at: Option<DateTime<Utc>>,
}

impl AlertThrottle {
    pub fn new(cooldown_seconds: u64) -> Self {
        let secs = i64::try_from(cooldown_seconds).unwrap_or(i64::MAX);
        Self {
            cooldown: Duration::try_seconds(secs).unwrap_or(Duration::MAX),
            last_alert_at: None,
        }
    }

    pub fn cooldown_seconds(&self) -> i64 {
        self.cooldown.num_seconds()
    }

    pub fn last_alert_at(&self) -> Option<DateTime<Utc>> {
        self.last_alert_at
    }

    /// State as seen at `now`.
    pub fn state(&self, now: DateTime<Utc>) -> ThrottleState {
        match self.last_alert_at {
            None => ThrottleState::Armed,
            Some(last) => {
                let elapsed = now.signed_duration_since(last);
                if elapsed >= self.cooldown {
                    ThrottleState::Armed
                } else {
                    ThrottleState::Cooling {
                        remaining_secs: (self.cooldown - elapsed).num_seconds(),
                    }
                }
            }
        }
    }

    /// Offer an opportunity at `now`.
    ///
    /// When armed, records `now` as the last alert time and moves to Cooling.
    pub fn check(&mut self, now: DateTime<Utc>) -> ThrottleDecision {
        match self.state(now) {
            ThrottleState::Armed => {
                self.last_alert_at = Some(now);
                ThrottleDecision::Dispatch
            }
            ThrottleState::Cooling { remaining_secs } => {
                debug!(remaining_secs, "Alert suppressed due to cooldown");
                ThrottleDecision::Suppress { remaining_secs }
            }
        }
    }
}
