//! Google Calendar v3 payloads
//!
//! Only the fields the availability engine reads are modelled; everything
//! else in the responses is ignored.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Deserialize;
use slotwise_core::TokenRefresh;
use slotwise_domain::{CalendarEvent, EventStatus, EventTime};
use tracing::warn;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CalendarListResponse {
    #[serde(default)]
    pub items: Vec<CalendarListEntry>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CalendarListEntry {
    pub id: String,
    #[serde(default)]
    pub deleted: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EventsResponse {
    #[serde(default)]
    pub items: Vec<GoogleEvent>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GoogleEvent {
    pub id: String,
    pub status: Option<String>,
    pub summary: Option<String>,
    pub start: Option<GoogleEventTime>,
    pub end: Option<GoogleEventTime>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GoogleEventTime {
    pub date_time: Option<DateTime<FixedOffset>>,
    pub date: Option<NaiveDate>,
}

impl GoogleEventTime {
    fn to_event_time(&self) -> Option<EventTime> {
        match (self.date_time, self.date) {
            (Some(at), _) => Some(EventTime::DateTime(at)),
            (None, Some(day)) => Some(EventTime::Date(day)),
            (None, None) => None,
        }
    }
}

impl GoogleEvent {
    /// Missing or unknown statuses count as confirmed.
    pub fn event_status(&self) -> EventStatus {
        self.status
            .as_deref()
            .and_then(|status| status.parse::<EventStatus>().ok())
            .unwrap_or(EventStatus::Confirmed)
    }

    /// Busy interval for this item, or `None` for cancelled and malformed
    /// items.
    pub fn into_busy_event(self, calendar_id: &str) -> Option<CalendarEvent> {
        if self.event_status() == EventStatus::Cancelled {
            return None;
        }

        let (Some(start), Some(end)) = (
            self.start.as_ref().and_then(GoogleEventTime::to_event_time),
            self.end.as_ref().and_then(GoogleEventTime::to_event_time),
        ) else {
            warn!(calendar_id, event_id = %self.id, "event without start/end; skipping");
            return None;
        };

        let summary = self.summary.filter(|s| !s.trim().is_empty());
        match CalendarEvent::new(self.id.clone(), summary, start, end) {
            Ok(event) => Some(event),
            Err(err) => {
                warn!(calendar_id, event_id = %self.id, error = %err, "malformed event; skipping");
                None
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl From<TokenResponse> for TokenRefresh {
    fn from(value: TokenResponse) -> Self {
        TokenRefresh {
            access_token: value.access_token,
            expires_in_seconds: value.expires_in,
            refresh_token: value.refresh_token,
        }
    }
}
