//! HTTP handlers

pub mod availability;
pub mod health;

pub use availability::{get_schedule_availability, preview_availability};
pub use health::get_health;
