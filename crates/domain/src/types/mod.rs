//! Domain types and models
//!
//! Every value object validates its invariants at construction and on
//! deserialization, so the availability engine never sees a slot that ends
//! before it starts or a policy whose break lies outside working hours.

pub mod availability;
pub mod booking;
pub mod credential;
pub mod event;
pub mod policy;
pub mod principal;
pub mod schedule;
pub mod slot;

pub use availability::{AvailabilityOutcome, AvailabilityResponse};
pub use booking::ConfirmedBooking;
pub use credential::AccessCredential;
pub use event::{CalendarEvent, EventStatus, EventTime};
pub use policy::{BreakWindow, DateRange, WorkingHoursPolicy};
pub use principal::{Principal, Team};
pub use schedule::Schedule;
pub use slot::{clock_time, TimeSlot};
