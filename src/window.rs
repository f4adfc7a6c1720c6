//! Ready-made availability windows.
//!
//! Apps with their own availability model can implement
//! [`AvailabilityWindow`] directly; these cover the two common shapes.

use chrono::{NaiveDateTime, NaiveTime, TimeDelta, Weekday};
use serde::{Deserialize, Serialize};

use crate::traits::{AvailabilityWindow, Visit};

/// Recurring slot on one weekday, e.g. every Monday 08:00-12:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyWindow {
    pub weekday: Weekday,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl WeeklyWindow {
    pub fn new(weekday: Weekday, start: NaiveTime, end: NaiveTime) -> Self {
        Self { weekday, start, end }
    }

    /// Offset of the window's end from midnight. An end of `00:00` or the
    /// last representable instant of the day both mean midnight.
    fn end_offset(&self) -> TimeDelta {
        let last_instant = NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999);
        if self.end == NaiveTime::MIN || Some(self.end) == last_instant {
            TimeDelta::days(1)
        } else {
            self.end - NaiveTime::MIN
        }
    }
}

impl AvailabilityWindow for WeeklyWindow {
    fn covers<V: Visit + ?Sized>(&self, visit: &V) -> bool {
        if visit.weekday() != self.weekday {
            return false;
        }
        // Measure both ends from the visit's own midnight, so a visit ending
        // at next-day 00:00 sits at exactly one day and later ends never fit.
        let midnight = visit.start().date().and_time(NaiveTime::MIN);
        let from = visit.start() - midnight;
        let to = visit.end() - midnight;
        self.start - NaiveTime::MIN <= from && to <= self.end_offset()
    }
}

/// One-off absolute span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateTimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateTimeWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }
}

impl AvailabilityWindow for DateTimeWindow {
    fn covers<V: Visit + ?Sized>(&self, visit: &V) -> bool {
        self.start <= visit.start() && visit.end() <= self.end
    }
}
