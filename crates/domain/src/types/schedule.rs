//! Schedule records resolved through the schedule directory

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::policy::{DateRange, WorkingHoursPolicy};
use super::principal::Principal;

/// A published schedule: who is bookable, when, and in which local zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub id: String,
    /// Host user; their credential verifies bookings that have no assignee.
    pub owner_id: String,
    pub principal: Principal,
    pub policy: WorkingHoursPolicy,
    pub date_range: DateRange,
    /// Zone in which slot clock times are expressed.
    #[serde(default = "default_timezone")]
    pub timezone: Tz,
}

fn default_timezone() -> Tz {
    Tz::UTC
}
