//! World clock
//!
//! In-game day and minute, ticking forward while the viewer runs.

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Broad phase of the day, used for tinting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeOfDay {
    Dawn,
    Day,
    Dusk,
    Night,
}

/// Day counter plus minute of day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clock {
    day: u32,
    minute: u32,
    /// Real seconds per in-game minute
    tick_interval: f32,
    #[serde(skip)]
    since_last_tick: f32,
}

impl Clock {
    /// Create a clock starting at `minute` on day one
    pub fn new(minute: u32, tick_interval: f32) -> Self {
        Self {
            day: 1,
            minute: minute % MINUTES_PER_DAY,
            tick_interval,
            since_last_tick: 0.0,
        }
    }

    /// Feed real time; returns true if at least one in-game minute passed
    pub fn update(&mut self, delta: Duration) -> bool {
        if self.tick_interval <= 0.0 {
            return false;
        }
        self.since_last_tick += delta.as_secs_f32();
        let mut ticked = false;
        while self.since_last_tick >= self.tick_interval {
            self.since_last_tick -= self.tick_interval;
            self.advance(1);
            ticked = true;
        }
        ticked
    }

    /// Move forward by whole minutes, rolling over into new days
    pub fn advance(&mut self, minutes: u32) {
        let total = self.minute + minutes;
        self.day += total / MINUTES_PER_DAY;
        self.minute = total % MINUTES_PER_DAY;
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    pub fn hour(&self) -> u32 {
        self.minute / 60
    }

    pub fn time_of_day(&self) -> TimeOfDay {
        match self.hour() {
            5..=7 => TimeOfDay::Dawn,
            8..=17 => TimeOfDay::Day,
            18..=20 => TimeOfDay::Dusk,
            _ => TimeOfDay::Night,
        }
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(8 * 60, 1.0) // 08:00, one minute per second
    }
}
