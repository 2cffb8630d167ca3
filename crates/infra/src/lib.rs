//! # Slotwise Infrastructure
//!
//! Infrastructure implementations of the core availability ports.
//!
//! This crate contains:
//! - The Google Calendar provider (REST + OAuth refresh)
//! - A retrying HTTP client
//! - The JSON record store for credentials, schedules and bookings
//! - Configuration loading and tracing setup
//!
//! ## Architecture
//! - Implements traits defined in `slotwise-core`
//! - Depends on `slotwise-domain` and `slotwise-core`
//! - Contains all "impure" code (network, filesystem, environment)

pub mod config;
pub mod errors;
pub mod http;
pub mod integrations;
pub mod observability;
pub mod storage;

// Re-export commonly used items
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use integrations::GoogleCalendarProvider;
pub use observability::init_tracing;
pub use storage::{DataFile, JsonFileStore};
