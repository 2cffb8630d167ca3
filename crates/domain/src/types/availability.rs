//! Result shapes of the exposed availability API

use serde::{Deserialize, Serialize};

use super::slot::TimeSlot;

/// Bookable slots for a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub slots: Vec<TimeSlot>,
    pub is_team: bool,
    pub is_guest_considered: bool,
}

/// Either a trustworthy slot set or the signal to use statically configured
/// slots instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AvailabilityOutcome {
    Available(AvailabilityResponse),
    Fallback { reason: String },
}

impl AvailabilityOutcome {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    pub fn response(&self) -> Option<&AvailabilityResponse> {
        match self {
            Self::Available(response) => Some(response),
            Self::Fallback { .. } => None,
        }
    }
}
