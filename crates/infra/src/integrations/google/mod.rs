//! Google Calendar integration
//!
//! Implements the core `CalendarProvider` port against the Calendar v3 REST
//! API and the OAuth token endpoint.

mod provider;
mod wire;

pub use provider::GoogleCalendarProvider;
