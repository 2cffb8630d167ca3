//! Interval overlap resolution
//!
//! Every conflict decision in the engine (break exclusion, busy events,
//! confirmed bookings) goes through [`overlaps`]. Intervals are half-open, so
//! a meeting ending at 10:00 never blocks a slot starting at 10:00.

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use chrono_tz::Tz;
use slotwise_domain::{CalendarEvent, TimeSlot};

/// Half-open overlap test: `[a_start, a_end)` vs `[b_start, b_end)`.
#[inline]
pub fn overlaps<T: PartialOrd>(a_start: T, a_end: T, b_start: T, b_end: T) -> bool {
    a_start < b_end && b_start < a_end
}

/// Local wall-clock interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Interval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Interval {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    pub fn from_slot(slot: &TimeSlot) -> Self {
        Self::new(slot.local_start(), slot.local_end())
    }

    /// Busy interval of an event as seen from `tz`.
    pub fn from_event(event: &CalendarEvent, tz: Tz) -> Self {
        let (start, end) = event.local_interval(tz);
        Self::new(start, end)
    }

    /// `[day 00:00, next day 00:00)`
    pub fn whole_day(day: NaiveDate) -> Self {
        let start = day.and_time(NaiveTime::MIN);
        let end = day
            .checked_add_days(Days::new(1))
            .map_or(NaiveDateTime::MAX, |next| next.and_time(NaiveTime::MIN));
        Self::new(start, end)
    }

    pub fn overlaps(&self, other: &Interval) -> bool {
        overlaps(self.start, self.end, other.start, other.end)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}
