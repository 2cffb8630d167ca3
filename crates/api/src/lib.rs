//! # Slotwise API
//!
//! HTTP application layer - handlers, router and main entry point.
//!
//! This crate contains:
//! - Axum handlers for the availability endpoints
//! - Application context (dependency injection)
//! - Router assembly and request logging
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture

pub mod commands;
pub mod context;
pub mod routes;
pub mod utils;

pub use context::AppContext;
pub use routes::router;
