use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use slotwise_core::{CalendarProvider, EventPage, RemoteEvent, TokenRefresh};
use slotwise_domain::{CalendarEvent, EventStatus, Result as DomainResult, SlotwiseError};

/// One recorded `list_events` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRequest {
    pub access_token: String,
    pub calendar_id: String,
    pub page_cursor: Option<String>,
}

#[derive(Default)]
struct ProviderState {
    calendars: HashMap<String, Vec<String>>,
    listing_failures: HashSet<String>,
    pages: HashMap<(String, String), Vec<Vec<CalendarEvent>>>,
    failing_calendars: HashSet<(String, String)>,
    remote_events: HashMap<String, EventStatus>,
    verification_failures: HashSet<String>,
    grants: HashMap<String, TokenRefresh>,
    event_requests: Vec<EventRequest>,
    lookups: Vec<(String, String)>,
    refresh_requests: Vec<String>,
}

/// In-memory mock for `CalendarProvider`.
///
/// Everything is keyed by access token so several principals can share one
/// provider. Pages are served with `page-N` cursors. Unknown refresh tokens
/// are rejected the way a real token endpoint answers `invalid_grant`.
#[derive(Default, Clone)]
pub struct MockCalendarProvider {
    state: Arc<Mutex<ProviderState>>,
}

impl MockCalendarProvider {
    pub fn with_calendars(self, access_token: &str, calendar_ids: &[&str]) -> Self {
        self.state.lock().unwrap().calendars.insert(
            access_token.to_string(),
            calendar_ids.iter().map(|id| id.to_string()).collect(),
        );
        self
    }

    pub fn with_listing_failure(self, access_token: &str) -> Self {
        self.state.lock().unwrap().listing_failures.insert(access_token.to_string());
        self
    }

    /// Single-page calendar.
    pub fn with_events(self, access_token: &str, calendar_id: &str, events: Vec<CalendarEvent>) -> Self {
        self.with_pages(access_token, calendar_id, vec![events])
    }

    pub fn with_pages(
        self,
        access_token: &str,
        calendar_id: &str,
        pages: Vec<Vec<CalendarEvent>>,
    ) -> Self {
        self.state
            .lock()
            .unwrap()
            .pages
            .insert((access_token.to_string(), calendar_id.to_string()), pages);
        self
    }

    pub fn with_failing_calendar(self, access_token: &str, calendar_id: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .failing_calendars
            .insert((access_token.to_string(), calendar_id.to_string()));
        self
    }

    /// Event visible to live verification. Events never registered are
    /// reported as not found.
    pub fn with_remote_event(self, event_id: &str, status: EventStatus) -> Self {
        self.state.lock().unwrap().remote_events.insert(event_id.to_string(), status);
        self
    }

    pub fn with_verification_failure(self, event_id: &str) -> Self {
        self.state.lock().unwrap().verification_failures.insert(event_id.to_string());
        self
    }

    pub fn with_grant(self, refresh_token: &str, grant: TokenRefresh) -> Self {
        self.state.lock().unwrap().grants.insert(refresh_token.to_string(), grant);
        self
    }

    pub fn cancel_event(&self, event_id: &str) {
        self.state.lock().unwrap().remote_events.insert(event_id.to_string(), EventStatus::Cancelled);
    }

    pub fn event_requests(&self) -> Vec<EventRequest> {
        self.state.lock().unwrap().event_requests.clone()
    }

    /// `(access_token, event_id)` of every live lookup.
    pub fn lookups(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().lookups.clone()
    }

    pub fn refresh_requests(&self) -> Vec<String> {
        self.state.lock().unwrap().refresh_requests.clone()
    }
}

#[async_trait]
impl CalendarProvider for MockCalendarProvider {
    async fn list_calendars(&self, access_token: &str) -> DomainResult<Vec<String>> {
        let state = self.state.lock().unwrap();
        if state.listing_failures.contains(access_token) {
            return Err(SlotwiseError::Network("calendarList unavailable".into()));
        }
        Ok(state.calendars.get(access_token).cloned().unwrap_or_default())
    }

    async fn list_events(
        &self,
        access_token: &str,
        calendar_id: &str,
        _time_min: DateTime<Utc>,
        _time_max: DateTime<Utc>,
        page_cursor: Option<&str>,
    ) -> DomainResult<EventPage> {
        let mut state = self.state.lock().unwrap();
        state.event_requests.push(EventRequest {
            access_token: access_token.to_string(),
            calendar_id: calendar_id.to_string(),
            page_cursor: page_cursor.map(str::to_string),
        });

        let key = (access_token.to_string(), calendar_id.to_string());
        if state.failing_calendars.contains(&key) {
            return Err(SlotwiseError::Network(format!("events for {calendar_id} unavailable")));
        }

        let index = page_cursor
            .and_then(|cursor| cursor.strip_prefix("page-"))
            .and_then(|n| n.parse::<usize>().ok())
            .unwrap_or(0);
        let Some(pages) = state.pages.get(&key) else {
            return Ok(EventPage::default());
        };

        let events = pages.get(index).cloned().unwrap_or_default();
        let next_page_cursor = (index + 1 < pages.len()).then(|| format!("page-{}", index + 1));
        Ok(EventPage { events, next_page_cursor })
    }

    async fn get_event(
        &self,
        access_token: &str,
        _calendar_id: &str,
        event_id: &str,
    ) -> DomainResult<Option<RemoteEvent>> {
        let mut state = self.state.lock().unwrap();
        state.lookups.push((access_token.to_string(), event_id.to_string()));

        if state.verification_failures.contains(event_id) {
            return Err(SlotwiseError::Network("events.get timed out".into()));
        }
        Ok(state
            .remote_events
            .get(event_id)
            .map(|status| RemoteEvent { id: event_id.to_string(), status: *status }))
    }

    async fn refresh_token(&self, refresh_token: &str) -> DomainResult<TokenRefresh> {
        let mut state = self.state.lock().unwrap();
        state.refresh_requests.push(refresh_token.to_string());
        state
            .grants
            .get(refresh_token)
            .cloned()
            .ok_or_else(|| SlotwiseError::Auth("invalid_grant".into()))
    }
}
