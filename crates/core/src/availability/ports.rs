//! Port interfaces for availability reconciliation
//!
//! These traits define the boundaries between the engine and the calendar
//! provider, credential storage, booking storage and schedule directory.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use slotwise_domain::{
    AccessCredential, CalendarEvent, ConfirmedBooking, EventStatus, Result, Schedule,
};

/// One page of events from a single calendar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventPage {
    pub events: Vec<CalendarEvent>,
    pub next_page_cursor: Option<String>,
}

/// Live view of a single event, used to detect external cancellation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEvent {
    pub id: String,
    pub status: EventStatus,
}

/// Token endpoint response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRefresh {
    pub access_token: String,
    /// Lifetime reported by the provider, if any.
    pub expires_in_seconds: Option<i64>,
    /// Present only when the provider rotates refresh tokens.
    pub refresh_token: Option<String>,
}

/// Trait for calendar provider operations
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// List the ids of every calendar the token can read.
    async fn list_calendars(&self, access_token: &str) -> Result<Vec<String>>;

    /// Fetch one page of events overlapping `[time_min, time_max)`.
    async fn list_events(
        &self,
        access_token: &str,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
        page_cursor: Option<&str>,
    ) -> Result<EventPage>;

    /// Look up a single event. `Ok(None)` means the provider no longer knows it.
    async fn get_event(
        &self,
        access_token: &str,
        calendar_id: &str,
        event_id: &str,
    ) -> Result<Option<RemoteEvent>>;

    /// Exchange a refresh token for a new access token.
    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenRefresh>;
}

/// Trait for per-principal credential persistence
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn get(&self, principal_id: &str) -> Result<Option<AccessCredential>>;

    /// Point write keyed by principal id; last writer wins.
    async fn put(&self, principal_id: &str, credential: AccessCredential) -> Result<()>;
}

/// Trait for reading committed reservations
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn list_confirmed_bookings(&self, schedule_id: &str) -> Result<Vec<ConfirmedBooking>>;
}

/// Trait for resolving schedules to their principal and policy
#[async_trait]
pub trait ScheduleDirectory: Send + Sync {
    async fn resolve(&self, schedule_id: &str) -> Result<Option<Schedule>>;
}
