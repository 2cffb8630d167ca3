//! # Slotwise Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - The availability reconciliation engine
//! - Port/adapter interfaces (traits) for calendars, credentials, bookings
//!   and the schedule directory
//!
//! ## Architecture Principles
//! - Only depends on `slotwise-domain`
//! - No database, HTTP, or file code
//! - All external dependencies via traits
//! - Grid, overlap and intersection logic is synchronous and deterministic;
//!   the only suspension points are port calls

pub mod availability;
pub mod clock;

// Re-export specific items to avoid ambiguity
pub use availability::ports::{
    BookingStore, CalendarProvider, CredentialStore, EventPage, RemoteEvent, ScheduleDirectory,
    TokenRefresh,
};
pub use availability::{
    free_slots, generate_day_grid, intersect_slot_sets, overlaps, AvailabilityCalculator,
    AvailabilityPorts, AvailabilityService, BookingValidityFilter, EventAggregator,
    TeamAvailability, TokenLifecycleManager,
};
pub use clock::{Clock, FixedClock, SystemClock};
