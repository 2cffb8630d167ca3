//! Working-hours policy and date ranges supplied per computation

use chrono::{Days, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::slot::clock_time;
use crate::{Result, SlotwiseError};

/// A break excluded from the daily grid, `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakWindow {
    #[serde(with = "clock_time")]
    pub start: NaiveTime,
    #[serde(with = "clock_time")]
    pub end: NaiveTime,
}

/// Daily bookable window, optional break, and slot length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawWorkingHoursPolicy", rename_all = "camelCase")]
pub struct WorkingHoursPolicy {
    #[serde(with = "clock_time")]
    work_start: NaiveTime,
    #[serde(with = "clock_time")]
    work_end: NaiveTime,
    #[serde(rename = "break", skip_serializing_if = "Option::is_none")]
    break_window: Option<BreakWindow>,
    slot_duration_minutes: u32,
}

impl WorkingHoursPolicy {
    /// Build a policy.
    ///
    /// # Errors
    /// Returns `SlotwiseError::InvalidInput` unless `work_start < work_end`,
    /// the slot duration is positive, and any break satisfies
    /// `work_start <= break.start < break.end <= work_end`.
    pub fn new(
        work_start: NaiveTime,
        work_end: NaiveTime,
        break_window: Option<BreakWindow>,
        slot_duration_minutes: u32,
    ) -> Result<Self> {
        if work_start >= work_end {
            return Err(SlotwiseError::InvalidInput(format!(
                "work window must start before it ends ({work_start} >= {work_end})"
            )));
        }
        if slot_duration_minutes == 0 {
            return Err(SlotwiseError::InvalidInput("slot duration must be positive".into()));
        }
        if let Some(window) = break_window {
            if window.start >= window.end {
                return Err(SlotwiseError::InvalidInput(format!(
                    "break must start before it ends ({} >= {})",
                    window.start, window.end
                )));
            }
            if window.start < work_start || window.end > work_end {
                return Err(SlotwiseError::InvalidInput(format!(
                    "break {}-{} lies outside working hours {work_start}-{work_end}",
                    window.start, window.end
                )));
            }
        }

        Ok(Self { work_start, work_end, break_window, slot_duration_minutes })
    }

    pub fn work_start(&self) -> NaiveTime {
        self.work_start
    }

    pub fn work_end(&self) -> NaiveTime {
        self.work_end
    }

    pub fn break_window(&self) -> Option<BreakWindow> {
        self.break_window
    }

    pub fn slot_duration_minutes(&self) -> u32 {
        self.slot_duration_minutes
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawWorkingHoursPolicy {
    #[serde(with = "clock_time")]
    work_start: NaiveTime,
    #[serde(with = "clock_time")]
    work_end: NaiveTime,
    #[serde(default, rename = "break")]
    break_window: Option<BreakWindow>,
    slot_duration_minutes: u32,
}

impl TryFrom<RawWorkingHoursPolicy> for WorkingHoursPolicy {
    type Error = SlotwiseError;

    fn try_from(raw: RawWorkingHoursPolicy) -> Result<Self> {
        Self::new(raw.work_start, raw.work_end, raw.break_window, raw.slot_duration_minutes)
    }
}

/// Inclusive range of local calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDateRange", rename_all = "camelCase")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(SlotwiseError::InvalidInput(format!(
                "date range starts after it ends ({start} > {end})"
            )));
        }
        Ok(Self { start, end })
    }

    /// Range covering a single day.
    pub fn single(day: NaiveDate) -> Self {
        Self { start: day, end: day }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Every day in the range, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        let end = self.end;
        std::iter::successors(Some(self.start), |day| day.checked_add_days(Days::new(1)))
            .take_while(move |day| *day <= end)
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = SlotwiseError;

    fn try_from(raw: RawDateRange) -> Result<Self> {
        Self::new(raw.start, raw.end)
    }
}
