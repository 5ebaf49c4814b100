//! Exam countdown
//!
//! Remaining-time arithmetic for the exam screen. Expiry is reported once,
//! which is when the host auto-submits.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Result of one countdown tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownTick {
    /// Time remains
    Running(Duration),
    /// The deadline passed since the previous tick; reported once
    Expired,
    /// Expiry was already reported
    AlreadyExpired,
}

/// Countdown to an exam deadline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    ends_at: DateTime<Utc>,
    #[serde(default, skip_serializing)]
    expiry_reported: bool,
}

impl Countdown {
    pub fn new(ends_at: DateTime<Utc>) -> Self {
        Self {
            ends_at,
            expiry_reported: false,
        }
    }

    /// Countdown of `length` starting at `started_at`
    pub fn starting_at(started_at: DateTime<Utc>, length: Duration) -> Self {
        Self::new(started_at + length)
    }

    pub fn ends_at(&self) -> DateTime<Utc> {
        self.ends_at
    }

    /// Time left, never negative
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.ends_at - now).max(Duration::zero())
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.ends_at
    }

    /// Whether at most `window` remains (and the deadline has not passed)
    pub fn is_within(&self, now: DateTime<Utc>, window: Duration) -> bool {
        !self.is_expired(now) && self.remaining(now) <= window
    }

    pub fn tick(&mut self, now: DateTime<Utc>) -> CountdownTick {
        if !self.is_expired(now) {
            return CountdownTick::Running(self.remaining(now));
        }
        if self.expiry_reported {
            return CountdownTick::AlreadyExpired;
        }
        self.expiry_reported = true;
        tracing::info!(ends_at = %self.ends_at, "Exam time expired");
        CountdownTick::Expired
    }
}

/// Render as `HH:MM:SS`; hours are not wrapped at 24
pub fn format_hms(duration: Duration) -> String {
    let total = duration.num_seconds().max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}
