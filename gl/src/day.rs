//! Day boundary: which calendar day an instant belongs to
//!
//! A day runs from the boundary hour (04:00 by default) to the same hour the
//! next morning, so late-night activity counts toward the day it was planned for.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Hour at which a new day starts
pub const DEFAULT_START_HOUR: u32 = 4;

/// Maps instants to canonical days for a given start hour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayBoundary {
    start_hour: u32,
}

impl Default for DayBoundary {
    fn default() -> Self {
        Self {
            start_hour: DEFAULT_START_HOUR,
        }
    }
}

impl DayBoundary {
    /// Boundary starting at `start_hour`, clamped to 0..=23
    pub fn new(start_hour: u32) -> Self {
        Self {
            start_hour: start_hour.min(23),
        }
    }

    pub fn start_hour(&self) -> u32 {
        self.start_hour
    }

    /// Day that `now` belongs to, judged by its local wall-clock hour
    pub fn current_day<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> NaiveDate {
        self.day_of(now.naive_local())
    }

    /// Day that a wall-clock time belongs to
    pub fn day_of(&self, at: NaiveDateTime) -> NaiveDate {
        trace!(%at, start_hour = self.start_hour, "DayBoundary::day_of: called");
        let date = at.date();
        if at.hour() < self.start_hour {
            date.pred_opt().unwrap_or(date)
        } else {
            date
        }
    }

    /// `[start, end)` wall-clock window covered by `day`
    pub fn day_interval(&self, day: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
        let start_time = NaiveTime::from_hms_opt(self.start_hour, 0, 0).unwrap_or(NaiveTime::MIN);
        let start = day.and_time(start_time);
        (start, start + Duration::days(1))
    }

    /// Day for the current local time
    pub fn today(&self) -> NaiveDate {
        self.current_day(&Local::now())
    }
}

/// Day that `now` belongs to with the default 04:00 boundary
pub fn current_day<Tz: TimeZone>(now: &DateTime<Tz>) -> NaiveDate {
    DayBoundary::default().current_day(now)
}

/// `[04:00, next 04:00)` window covered by `day`
pub fn day_interval(day: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    DayBoundary::default().day_interval(day)
}
