//! Shared test helpers for `slotwise-core` integration tests.
//!
//! In-memory port doubles plus fixtures for the standard 09:00-18:00 policy
//! so each test can focus on behaviour instead of wiring.

#![allow(dead_code)]

pub mod calendar;
pub mod repositories;

use std::sync::Arc;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use slotwise_core::{AvailabilityPorts, AvailabilityService, FixedClock};
use slotwise_domain::{
    AccessCredential, AvailabilityConfig, BreakWindow, CalendarEvent, DateRange, EventTime,
    Principal, Schedule, TimeSlot, WorkingHoursPolicy,
};

pub use calendar::MockCalendarProvider;
pub use repositories::{MockBookingStore, MockCredentialStore, MockScheduleDirectory};

pub fn t(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

/// Monday 2024-06-10, the day every scenario runs on.
pub fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
}

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 9, 8, 0, 0).unwrap()
}

/// 09:00-18:00 with a 12:00-13:00 break and one-hour slots.
pub fn standard_policy() -> WorkingHoursPolicy {
    WorkingHoursPolicy::new(t(9, 0), t(18, 0), Some(BreakWindow { start: t(12, 0), end: t(13, 0) }), 60)
        .unwrap()
}

pub fn hourly(date: NaiveDate, hours: &[u32]) -> Vec<TimeSlot> {
    hours.iter().map(|hour| TimeSlot::new(date, t(*hour, 0), t(hour + 1, 0)).unwrap()).collect()
}

/// The eight free hours of [`standard_policy`] on `date`.
pub fn standard_day(date: NaiveDate) -> Vec<TimeSlot> {
    hourly(date, &[9, 10, 11, 13, 14, 15, 16, 17])
}

/// Timed event on `date` in UTC.
pub fn busy(id: &str, date: NaiveDate, from: NaiveTime, to: NaiveTime) -> CalendarEvent {
    let utc = FixedOffset::east_opt(0).unwrap();
    let start = utc.from_utc_datetime(&date.and_time(from));
    let end = utc.from_utc_datetime(&date.and_time(to));
    CalendarEvent::new(id, Some(format!("busy {id}")), EventTime::DateTime(start), EventTime::DateTime(end))
        .unwrap()
}

/// Credential valid for another hour past [`now`], with `access-<principal>`
/// as its token.
pub fn fresh_credential(principal_id: &str) -> AccessCredential {
    AccessCredential::new(
        format!("access-{principal_id}"),
        format!("refresh-{principal_id}"),
        now() + Duration::hours(1),
    )
}

/// Credential that expired a minute before [`now`].
pub fn expired_credential(principal_id: &str) -> AccessCredential {
    AccessCredential::new(
        format!("stale-{principal_id}"),
        format!("refresh-{principal_id}"),
        now() - Duration::minutes(1),
    )
}

pub fn schedule(id: &str, principal: Principal) -> Schedule {
    Schedule {
        id: id.to_string(),
        owner_id: "host".to_string(),
        principal,
        policy: standard_policy(),
        date_range: DateRange::single(monday()),
        timezone: chrono_tz::Tz::UTC,
    }
}

/// Every double the service needs, kept around for assertions.
pub struct Harness {
    pub provider: MockCalendarProvider,
    pub credentials: MockCredentialStore,
    pub bookings: MockBookingStore,
    pub directory: MockScheduleDirectory,
    pub clock: FixedClock,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            provider: MockCalendarProvider::default(),
            credentials: MockCredentialStore::default(),
            bookings: MockBookingStore::default(),
            directory: MockScheduleDirectory::default(),
            clock: FixedClock::new(now()),
        }
    }

    pub fn ports(&self) -> AvailabilityPorts {
        AvailabilityPorts::new(
            Arc::new(self.provider.clone()),
            Arc::new(self.credentials.clone()),
            Arc::new(self.bookings.clone()),
            Arc::new(self.directory.clone()),
        )
        .with_clock(Arc::new(self.clock.clone()))
    }

    pub fn service(&self) -> AvailabilityService {
        AvailabilityService::with_config(self.ports(), &AvailabilityConfig::default())
    }
}
