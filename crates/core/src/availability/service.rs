//! Availability service - the engine's single entry point

use std::sync::Arc;

use chrono_tz::Tz;
use slotwise_domain::{
    AvailabilityConfig, AvailabilityError, AvailabilityOutcome, AvailabilityResponse, DateRange,
    Principal, Schedule, TimeSlot, WorkingHoursPolicy,
};
use tracing::{info, instrument, warn};

use super::aggregator::EventAggregator;
use super::bookings::BookingValidityFilter;
use super::calculator::AvailabilityCalculator;
use super::intersection::{combine_with_guest, TeamAvailability};
use super::ports::{BookingStore, CalendarProvider, CredentialStore, ScheduleDirectory};
use super::tokens::TokenLifecycleManager;
use crate::clock::{Clock, SystemClock};

/// External collaborators the service is wired with.
#[derive(Clone)]
pub struct AvailabilityPorts {
    pub provider: Arc<dyn CalendarProvider>,
    pub credentials: Arc<dyn CredentialStore>,
    pub bookings: Arc<dyn BookingStore>,
    pub directory: Arc<dyn ScheduleDirectory>,
    pub clock: Arc<dyn Clock>,
}

impl AvailabilityPorts {
    /// Ports backed by the real system clock.
    pub fn new(
        provider: Arc<dyn CalendarProvider>,
        credentials: Arc<dyn CredentialStore>,
        bookings: Arc<dyn BookingStore>,
        directory: Arc<dyn ScheduleDirectory>,
    ) -> Self {
        Self { provider, credentials, bookings, directory, clock: Arc::new(SystemClock) }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

/// Bookable slots per schedule, with the static-slot fallback on any
/// uncertainty.
pub struct AvailabilityService {
    directory: Arc<dyn ScheduleDirectory>,
    calculator: Arc<AvailabilityCalculator>,
    team: TeamAvailability,
    bookings: BookingValidityFilter,
}

impl AvailabilityService {
    /// Create a service with default tunables
    pub fn new(ports: AvailabilityPorts) -> Self {
        Self::with_config(ports, &AvailabilityConfig::default())
    }

    pub fn with_config(ports: AvailabilityPorts, config: &AvailabilityConfig) -> Self {
        let tokens = Arc::new(
            TokenLifecycleManager::new(
                Arc::clone(&ports.credentials),
                Arc::clone(&ports.provider),
                Arc::clone(&ports.clock),
            )
            .with_default_lifetime_secs(config.default_token_lifetime_secs),
        );
        let aggregator = Arc::new(EventAggregator::from_config(Arc::clone(&ports.provider), config));
        let calculator = Arc::new(AvailabilityCalculator::new(Arc::clone(&tokens), aggregator));
        let bookings = BookingValidityFilter::new(ports.bookings, ports.provider, tokens)
            .with_calendar_id(config.default_calendar_id.clone());

        Self {
            directory: ports.directory,
            team: TeamAvailability::new(Arc::clone(&calculator)),
            calculator,
            bookings,
        }
    }

    /// Bookable slots for `schedule_id`, optionally narrowed to a guest's free
    /// time.
    ///
    /// Never fails: anything that makes the answer untrustworthy yields
    /// [`AvailabilityOutcome::Fallback`].
    #[instrument(skip_all, fields(schedule_id = %schedule_id, guest = guest_principal_id.unwrap_or("-")))]
    pub async fn get_availability(
        &self,
        schedule_id: &str,
        guest_principal_id: Option<&str>,
    ) -> AvailabilityOutcome {
        match self.resolve_and_compute(schedule_id, guest_principal_id).await {
            Ok(response) => {
                info!(
                    slots = response.slots.len(),
                    is_team = response.is_team,
                    is_guest_considered = response.is_guest_considered,
                    "availability computed"
                );
                AvailabilityOutcome::Available(response)
            }
            Err(err) => {
                warn!(error = %err, kind = err.label(), "availability unknown; signalling fallback");
                AvailabilityOutcome::Fallback { reason: err.to_string() }
            }
        }
    }

    /// Free slots for an unsaved policy, without bookings or a schedule record.
    ///
    /// # Errors
    /// The same credential and team errors as a persisted schedule.
    #[instrument(skip_all, fields(principal_id = %principal.id(), is_team = principal.is_team()))]
    pub async fn compute_availability(
        &self,
        policy: &WorkingHoursPolicy,
        date_range: &DateRange,
        principal: &Principal,
        timezone: Tz,
    ) -> Result<Vec<TimeSlot>, AvailabilityError> {
        self.team.for_principal(principal, policy, date_range, timezone).await
    }

    async fn resolve_and_compute(
        &self,
        schedule_id: &str,
        guest_principal_id: Option<&str>,
    ) -> Result<AvailabilityResponse, AvailabilityError> {
        let schedule = self.resolve(schedule_id).await?;

        let host = self.team.for_principal(
            &schedule.principal,
            &schedule.policy,
            &schedule.date_range,
            schedule.timezone,
        );
        let guest = async {
            match guest_principal_id {
                Some(guest_id) => Some(
                    self.calculator
                        .availability_for(
                            guest_id,
                            &schedule.policy,
                            &schedule.date_range,
                            schedule.timezone,
                        )
                        .await,
                ),
                None => None,
            }
        };
        let (host, guest) = tokio::join!(host, guest);

        let (slots, is_guest_considered) = combine_with_guest(host?, guest);
        let slots = self.bookings.apply(&schedule, slots).await?;

        Ok(AvailabilityResponse {
            slots,
            is_team: schedule.principal.is_team(),
            is_guest_considered,
        })
    }

    async fn resolve(&self, schedule_id: &str) -> Result<Schedule, AvailabilityError> {
        self.directory
            .resolve(schedule_id)
            .await
            .map_err(|err| AvailabilityError::DirectoryFailed { reason: err.to_string() })?
            .ok_or_else(|| AvailabilityError::ScheduleNotFound {
                schedule_id: schedule_id.to_string(),
            })
    }
}
