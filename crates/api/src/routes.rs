//! Router assembly

use std::sync::Arc;

use axum::routing::{get, post};
use axum::{middleware, Router};

use crate::commands;
use crate::context::AppContext;
use crate::utils::logging::log_request;

pub fn router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/health", get(commands::get_health))
        .route("/schedules/{schedule_id}/availability", get(commands::get_schedule_availability))
        .route("/availability/preview", post(commands::preview_availability))
        .layer(middleware::from_fn(log_request))
        .with_state(ctx)
}
