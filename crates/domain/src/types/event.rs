//! Busy intervals sourced from external calendars

use chrono::{DateTime, Days, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::impl_status_conversions;
use crate::{Result, SlotwiseError};

/// Start or end of a calendar event.
///
/// Serialized the way calendar providers shape it: `{"dateTime": "..."}` for
/// timed events, `{"date": "YYYY-MM-DD"}` for all-day events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventTime {
    DateTime(DateTime<FixedOffset>),
    Date(NaiveDate),
}

impl EventTime {
    pub fn is_all_day(&self) -> bool {
        matches!(self, Self::Date(_))
    }
}

/// A busy interval fetched from a calendar. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCalendarEvent")]
pub struct CalendarEvent {
    id: String,
    summary: Option<String>,
    start: EventTime,
    end: EventTime,
}

impl CalendarEvent {
    /// Create an event. Start and end must be of the same kind (both timed or
    /// both all-day) and the event must not end before it starts.
    pub fn new(
        id: impl Into<String>,
        summary: Option<String>,
        start: EventTime,
        end: EventTime,
    ) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(SlotwiseError::InvalidInput("calendar event id is empty".into()));
        }

        let ordered = match (start, end) {
            (EventTime::DateTime(s), EventTime::DateTime(e)) => s <= e,
            (EventTime::Date(s), EventTime::Date(e)) => s <= e,
            _ => {
                return Err(SlotwiseError::InvalidInput(format!(
                    "calendar event {id} mixes all-day and timed boundaries"
                )))
            }
        };
        if !ordered {
            return Err(SlotwiseError::InvalidInput(format!(
                "calendar event {id} ends before it starts"
            )));
        }

        Ok(Self { id, summary, start, end })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn start(&self) -> EventTime {
        self.start
    }

    pub fn end(&self) -> EventTime {
        self.end
    }

    pub fn is_all_day(&self) -> bool {
        self.start.is_all_day()
    }

    /// Absolute `[start, end)` of a timed event. `None` for all-day events,
    /// which only exist on the local calendar.
    pub fn utc_bounds(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        match (self.start, self.end) {
            (EventTime::DateTime(start), EventTime::DateTime(end)) => {
                Some((start.with_timezone(&Utc), end.with_timezone(&Utc)))
            }
            _ => None,
        }
    }

    /// Half-open local interval `[start, end)` in the given time zone.
    ///
    /// All-day events cover whole local days: `[first 00:00, end 00:00)` with
    /// the provider's exclusive end date, and at least one full day.
    pub fn local_interval(&self, tz: Tz) -> (NaiveDateTime, NaiveDateTime) {
        match (self.start, self.end) {
            (EventTime::DateTime(start), EventTime::DateTime(end)) => {
                (start.with_timezone(&tz).naive_local(), end.with_timezone(&tz).naive_local())
            }
            (EventTime::Date(start), EventTime::Date(end)) => {
                let next_day = start.checked_add_days(Days::new(1)).unwrap_or(start);
                let end = end.max(next_day);
                (start.and_time(NaiveTime::MIN), end.and_time(NaiveTime::MIN))
            }
            // Mixed boundaries are rejected by the constructor.
            (EventTime::DateTime(start), EventTime::Date(end)) => {
                (start.with_timezone(&tz).naive_local(), end.and_time(NaiveTime::MIN))
            }
            (EventTime::Date(start), EventTime::DateTime(end)) => {
                (start.and_time(NaiveTime::MIN), end.with_timezone(&tz).naive_local())
            }
        }
    }
}

#[derive(Deserialize)]
struct RawCalendarEvent {
    id: String,
    #[serde(default)]
    summary: Option<String>,
    start: EventTime,
    end: EventTime,
}

impl TryFrom<RawCalendarEvent> for CalendarEvent {
    type Error = SlotwiseError;

    fn try_from(raw: RawCalendarEvent) -> Result<Self> {
        Self::new(raw.id, raw.summary, raw.start, raw.end)
    }
}

/// Lifecycle status of an event as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Confirmed,
    Tentative,
    Cancelled,
}

impl_status_conversions!(EventStatus {
    Confirmed => "confirmed",
    Tentative => "tentative",
    Cancelled => "cancelled",
});
