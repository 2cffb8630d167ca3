//! Shared helpers for request handlers

pub mod health;
pub mod logging;
