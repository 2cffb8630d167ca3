//! Multi-calendar busy-event aggregation
//!
//! Lists every calendar a token can see, pages each one concurrently and
//! folds the results into a single de-duplicated set keyed by event id.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use slotwise_domain::constants::{DEFAULT_CALENDAR_ID, DEFAULT_MAX_PAGES_PER_CALENDAR};
use slotwise_domain::{AvailabilityConfig, AvailabilityError, CalendarEvent};
use tracing::{debug, instrument, warn};

use super::ports::CalendarProvider;

/// Busy events for one access token across all of its calendars.
pub struct EventAggregator {
    provider: Arc<dyn CalendarProvider>,
    max_pages_per_calendar: u32,
    default_calendar_id: String,
}

impl EventAggregator {
    pub fn new(provider: Arc<dyn CalendarProvider>) -> Self {
        Self {
            provider,
            max_pages_per_calendar: DEFAULT_MAX_PAGES_PER_CALENDAR,
            default_calendar_id: DEFAULT_CALENDAR_ID.to_string(),
        }
    }

    pub fn from_config(provider: Arc<dyn CalendarProvider>, config: &AvailabilityConfig) -> Self {
        Self::new(provider)
            .with_max_pages(config.max_pages_per_calendar)
            .with_default_calendar(config.default_calendar_id.clone())
    }

    /// Page ceiling per calendar. Calendars with more pages are truncated.
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages_per_calendar = max_pages.max(1);
        self
    }

    /// Calendar consulted alone when calendar listing fails.
    pub fn with_default_calendar(mut self, calendar_id: impl Into<String>) -> Self {
        self.default_calendar_id = calendar_id.into();
        self
    }

    pub fn default_calendar_id(&self) -> &str {
        &self.default_calendar_id
    }

    /// Fetch the de-duplicated busy events overlapping `[time_min, time_max)`.
    ///
    /// Never fails: a calendar whose fetch errors contributes nothing, and a
    /// failed listing narrows the search to the default calendar.
    #[instrument(skip_all, fields(time_min = %time_min, time_max = %time_max))]
    pub async fn fetch_busy_events(
        &self,
        access_token: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> Vec<CalendarEvent> {
        let calendar_ids = self.calendar_ids(access_token).await;

        let fetches = calendar_ids
            .iter()
            .map(|calendar_id| self.fetch_calendar(access_token, calendar_id, time_min, time_max));
        let per_calendar = join_all(fetches).await;

        let mut by_id: BTreeMap<String, CalendarEvent> = BTreeMap::new();
        for (calendar_id, result) in calendar_ids.iter().zip(per_calendar) {
            match result {
                Ok(events) => {
                    for event in events {
                        // Same id through several calendars: keep the last one seen.
                        by_id.insert(event.id().to_string(), event);
                    }
                }
                Err(err) => {
                    warn!(
                        calendar_id = %calendar_id,
                        error = %err,
                        kind = err.label(),
                        "calendar fetch failed; treating as no busy events"
                    );
                }
            }
        }

        debug!(
            calendar_count = calendar_ids.len(),
            event_count = by_id.len(),
            "aggregated busy events"
        );
        by_id.into_values().collect()
    }

    async fn calendar_ids(&self, access_token: &str) -> Vec<String> {
        match self.provider.list_calendars(access_token).await {
            Ok(ids) if !ids.is_empty() => ids,
            Ok(_) => {
                debug!(calendar_id = %self.default_calendar_id, "no calendars listed; using default");
                vec![self.default_calendar_id.clone()]
            }
            Err(err) => {
                warn!(
                    error = %err,
                    calendar_id = %self.default_calendar_id,
                    "calendar listing failed; falling back to default calendar"
                );
                vec![self.default_calendar_id.clone()]
            }
        }
    }

    #[instrument(skip_all, fields(calendar_id = %calendar_id))]
    async fn fetch_calendar(
        &self,
        access_token: &str,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>, AvailabilityError> {
        let mut events = Vec::new();
        let mut cursor: Option<String> = None;
        let mut page = 0u32;

        loop {
            let batch = self
                .provider
                .list_events(access_token, calendar_id, time_min, time_max, cursor.as_deref())
                .await
                .map_err(|err| AvailabilityError::ProviderFetchFailed {
                    calendar_id: calendar_id.to_string(),
                    reason: err.to_string(),
                })?;
            page += 1;

            debug!(page, event_count = batch.events.len(), "fetched event page");
            events.extend(batch.events);

            match batch.next_page_cursor {
                Some(next) if !next.is_empty() => {
                    if page >= self.max_pages_per_calendar {
                        warn!(
                            page,
                            max_pages = self.max_pages_per_calendar,
                            "page ceiling reached; truncating calendar"
                        );
                        break;
                    }
                    cursor = Some(next);
                }
                _ => break,
            }
        }

        Ok(events)
    }
}
