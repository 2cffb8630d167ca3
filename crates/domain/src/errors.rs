//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Slotwise
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum SlotwiseError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Slotwise operations
pub type Result<T> = std::result::Result<T, SlotwiseError>;

/// Reasons an availability computation could not produce a trustworthy answer.
///
/// None of these are fatal: callers surface them as "availability unknown"
/// and the public API turns them into the static-slot fallback signal.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AvailabilityError {
    #[error("no stored calendar credential for principal {principal_id}")]
    CredentialMissing { principal_id: String },

    #[error("credential refresh failed for principal {principal_id}: {reason}")]
    CredentialRefreshFailed { principal_id: String, reason: String },

    #[error("credential store unavailable for principal {principal_id}: {reason}")]
    CredentialStoreFailed { principal_id: String, reason: String },

    #[error("calendar fetch failed for {calendar_id}: {reason}")]
    ProviderFetchFailed { calendar_id: String, reason: String },

    #[error("availability unknown for team members: {}", unknown_members.join(", "))]
    TeamPartialUnknown { unknown_members: Vec<String> },

    #[error("team {team_id} has no members")]
    EmptyTeam { team_id: String },

    #[error("could not verify calendar event {event_id}: {reason}")]
    LiveEventVerificationFailed { event_id: String, reason: String },

    #[error("schedule {schedule_id} not found")]
    ScheduleNotFound { schedule_id: String },

    #[error("schedule directory unavailable: {reason}")]
    DirectoryFailed { reason: String },

    #[error("confirmed bookings unavailable for schedule {schedule_id}: {reason}")]
    BookingsUnavailable { schedule_id: String, reason: String },
}

impl AvailabilityError {
    /// Stable label suitable for structured logging fields.
    pub fn label(&self) -> &'static str {
        match self {
            Self::CredentialMissing { .. } => "credential_missing",
            Self::CredentialRefreshFailed { .. } => "credential_refresh_failed",
            Self::CredentialStoreFailed { .. } => "credential_store_failed",
            Self::ProviderFetchFailed { .. } => "provider_fetch_failed",
            Self::TeamPartialUnknown { .. } => "team_partial_unknown",
            Self::EmptyTeam { .. } => "empty_team",
            Self::LiveEventVerificationFailed { .. } => "live_event_verification_failed",
            Self::ScheduleNotFound { .. } => "schedule_not_found",
            Self::DirectoryFailed { .. } => "directory_failed",
            Self::BookingsUnavailable { .. } => "bookings_unavailable",
        }
    }
}
