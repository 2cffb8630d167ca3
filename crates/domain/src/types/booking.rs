//! Committed reservations, read-only to the availability engine

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::slot::clock_time;

/// A reservation created by the booking flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmedBooking {
    pub schedule_id: String,
    pub date: NaiveDate,
    #[serde(with = "clock_time")]
    pub start_time: NaiveTime,
    #[serde(with = "clock_time")]
    pub end_time: NaiveTime,
    /// Team member the booking was routed to.
    #[serde(default)]
    pub assigned_user_id: Option<String>,
    /// Event the booking created on the host's calendar.
    #[serde(default)]
    pub host_calendar_event_id: Option<String>,
}
