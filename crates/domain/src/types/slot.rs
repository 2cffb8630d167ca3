//! Bookable time slot value object

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::{Result, SlotwiseError};

/// A candidate or resolved bookable interval on one local calendar day.
///
/// Identity is structural: two slots are the same slot iff date, start and
/// end all match. Intersection, de-duplication and booking matching all rely
/// on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawTimeSlot", rename_all = "camelCase")]
pub struct TimeSlot {
    date: NaiveDate,
    #[serde(with = "clock_time")]
    start_time: NaiveTime,
    #[serde(with = "clock_time")]
    end_time: NaiveTime,
}

impl TimeSlot {
    /// Create a slot, rejecting empty/inverted ranges and sub-minute times.
    pub fn new(date: NaiveDate, start_time: NaiveTime, end_time: NaiveTime) -> Result<Self> {
        if start_time >= end_time {
            return Err(SlotwiseError::InvalidInput(format!(
                "slot on {date} must start before it ends ({start_time} >= {end_time})"
            )));
        }
        if !is_whole_minute(start_time) || !is_whole_minute(end_time) {
            return Err(SlotwiseError::InvalidInput(format!(
                "slot on {date} must use minute precision ({start_time}-{end_time})"
            )));
        }
        Ok(Self { date, start_time, end_time })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn start_time(&self) -> NaiveTime {
        self.start_time
    }

    pub fn end_time(&self) -> NaiveTime {
        self.end_time
    }

    /// Local start as a naive datetime.
    pub fn local_start(&self) -> NaiveDateTime {
        self.date.and_time(self.start_time)
    }

    /// Local end as a naive datetime.
    pub fn local_end(&self) -> NaiveDateTime {
        self.date.and_time(self.end_time)
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}-{}",
            self.date,
            self.start_time.format(crate::constants::CLOCK_TIME_FORMAT),
            self.end_time.format(crate::constants::CLOCK_TIME_FORMAT)
        )
    }
}

fn is_whole_minute(time: NaiveTime) -> bool {
    time.second() == 0 && time.nanosecond() == 0
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTimeSlot {
    date: NaiveDate,
    #[serde(with = "clock_time")]
    start_time: NaiveTime,
    #[serde(with = "clock_time")]
    end_time: NaiveTime,
}

impl TryFrom<RawTimeSlot> for TimeSlot {
    type Error = SlotwiseError;

    fn try_from(raw: RawTimeSlot) -> Result<Self> {
        Self::new(raw.date, raw.start_time, raw.end_time)
    }
}

/// Serde adapter for `"HH:MM"` clock times (`"HH:MM:SS"` is accepted on input).
pub mod clock_time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::constants::CLOCK_TIME_FORMAT;

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&time.format(CLOCK_TIME_FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        parse(&value).map_err(serde::de::Error::custom)
    }

    /// Parse a clock time in `HH:MM` or `HH:MM:SS` form.
    pub fn parse(value: &str) -> Result<NaiveTime, String> {
        let trimmed = value.trim();
        NaiveTime::parse_from_str(trimmed, CLOCK_TIME_FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
            .map_err(|e| format!("invalid clock time '{value}': {e}"))
    }
}
