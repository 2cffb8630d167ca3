//! Availability endpoints

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono_tz::Tz;
use serde::Deserialize;
use slotwise_domain::{
    AvailabilityOutcome, AvailabilityResponse, DateRange, Principal, WorkingHoursPolicy,
};
use tracing::warn;

use crate::context::AppContext;
use crate::utils::logging::log_command_execution;

#[derive(Debug, Default, Deserialize)]
pub struct AvailabilityQuery {
    /// Principal whose free time should narrow the result.
    pub guest: Option<String>,
}

/// Ad-hoc availability for a policy that has no stored schedule yet.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRequest {
    pub policy: WorkingHoursPolicy,
    pub date_range: DateRange,
    pub principal: Principal,
    #[serde(default = "default_timezone")]
    pub timezone: Tz,
}

fn default_timezone() -> Tz {
    Tz::UTC
}

/// `GET /schedules/{schedule_id}/availability?guest=<principal>`
///
/// Always answers 200; `status: "fallback"` tells the caller to use its
/// statically configured slots.
pub async fn get_schedule_availability(
    State(ctx): State<Arc<AppContext>>,
    Path(schedule_id): Path<String>,
    Query(query): Query<AvailabilityQuery>,
) -> Json<AvailabilityOutcome> {
    let started = Instant::now();
    let guest = query.guest.as_deref().map(str::trim).filter(|guest| !guest.is_empty());

    let outcome = ctx.availability.get_availability(&schedule_id, guest).await;

    log_command_execution(
        "availability::get_schedule_availability",
        started.elapsed(),
        !outcome.is_fallback(),
    );
    Json(outcome)
}

/// `POST /availability/preview`
///
/// Free slots for the posted policy and principal. Bookings are not
/// considered since nothing has been booked against an unsaved schedule.
pub async fn preview_availability(
    State(ctx): State<Arc<AppContext>>,
    Json(request): Json<PreviewRequest>,
) -> Json<AvailabilityOutcome> {
    let started = Instant::now();

    let outcome = match ctx
        .availability
        .compute_availability(&request.policy, &request.date_range, &request.principal, request.timezone)
        .await
    {
        Ok(slots) => AvailabilityOutcome::Available(AvailabilityResponse {
            slots,
            is_team: request.principal.is_team(),
            is_guest_considered: false,
        }),
        Err(err) => {
            warn!(error = %err, kind = err.label(), principal_id = %request.principal.id(), "preview fell back");
            AvailabilityOutcome::Fallback { reason: err.to_string() }
        }
    };

    log_command_execution("availability::preview_availability", started.elapsed(), !outcome.is_fallback());
    Json(outcome)
}
