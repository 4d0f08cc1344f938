//! The station countdown.
//!
//! The timer owns no clock: a single external tick source (the server's
//! 1-second interval task) calls [`CountdownTimer::tick`] and the timer
//! only advances while running. Expiry is advisory — it fires a single
//! event for the operator notice and the station keeps going until the
//! instructor finishes it explicitly.

use serde::Serialize;
use ts_rs::TS;

/// Remaining time at or below which the frontend shows the last-minute
/// visual state.
pub const LAST_MINUTE_SECS: u64 = 60;

/// Fired by [`CountdownTimer::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// The countdown just reached zero. Fired exactly once per reset.
    Expired,
}

#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CountdownTimer {
    duration_secs: u64,
    remaining_secs: u64,
    is_running: bool,
    expired_fired: bool,
}

impl CountdownTimer {
    pub fn new(duration_minutes: u32) -> Self {
        let duration_secs = u64::from(duration_minutes) * 60;
        Self {
            duration_secs,
            remaining_secs: duration_secs,
            is_running: false,
            expired_fired: false,
        }
    }

    pub fn start(&mut self) {
        self.is_running = true;
    }

    pub fn stop(&mut self) {
        self.is_running = false;
    }

    /// Back to the full duration, stopped, with the expiry latch cleared.
    pub fn reset(&mut self) {
        self.remaining_secs = self.duration_secs;
        self.is_running = false;
        self.expired_fired = false;
    }

    /// Advance one second. Does nothing while stopped or already at zero;
    /// on reaching zero the timer stops itself and reports `Expired` once.
    pub fn tick(&mut self) -> Option<TimerEvent> {
        if !self.is_running || self.remaining_secs == 0 {
            return None;
        }
        self.remaining_secs -= 1;
        if self.remaining_secs == 0 {
            self.is_running = false;
            if !self.expired_fired {
                self.expired_fired = true;
                return Some(TimerEvent::Expired);
            }
        }
        None
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn is_last_minute(&self) -> bool {
        self.remaining_secs <= LAST_MINUTE_SECS
    }

    pub fn duration_minutes(&self) -> u32 {
        (self.duration_secs / 60) as u32
    }
}
