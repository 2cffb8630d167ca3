//! Availability reconciliation engine
//!
//! Leaves first: `grid` and `overlap` are pure; `aggregator` and `tokens`
//! talk to the ports; `calculator`, `intersection` and `bookings` compose
//! them; `service` is the entry point the API layer calls.

pub mod aggregator;
pub mod bookings;
pub mod calculator;
pub mod grid;
pub mod intersection;
pub mod overlap;
pub mod ports;
pub mod service;
pub mod tokens;

pub use aggregator::EventAggregator;
pub use bookings::{remove_booked, BookingValidityFilter};
pub use calculator::{free_slots, query_window, AvailabilityCalculator};
pub use grid::generate_day_grid;
pub use intersection::{combine_with_guest, intersect, intersect_slot_sets, TeamAvailability};
pub use overlap::{overlaps, Interval};
pub use service::{AvailabilityPorts, AvailabilityService};
pub use tokens::TokenLifecycleManager;
