//! Observability setup
//!
//! Structured logging through `tracing`. Engine code only emits events; this
//! module owns the subscriber.

pub mod logging;

pub use logging::init_tracing;
