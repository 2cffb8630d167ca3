//! Confirmed-booking subtraction with live cancellation checks

use std::sync::Arc;

use futures::future::join_all;
use slotwise_domain::constants::DEFAULT_CALENDAR_ID;
use slotwise_domain::{AvailabilityError, ConfirmedBooking, EventStatus, Schedule, TimeSlot};
use tracing::{debug, info, instrument, warn};

use super::overlap::overlaps;
use super::ports::{BookingStore, CalendarProvider};
use super::tokens::TokenLifecycleManager;

/// Drop every slot that conflicts with one of `bookings`.
///
/// A booking conflicts with a slot on the same date whose clock interval
/// overlaps it; the exact-triple match is the usual case.
pub fn remove_booked(slots: Vec<TimeSlot>, bookings: &[ConfirmedBooking]) -> Vec<TimeSlot> {
    slots
        .into_iter()
        .filter(|slot| {
            !bookings.iter().any(|booking| {
                booking.date == slot.date()
                    && overlaps(
                        slot.start_time(),
                        slot.end_time(),
                        booking.start_time,
                        booking.end_time,
                    )
            })
        })
        .collect()
}

/// Outcome of checking one booking's host event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verification {
    /// Still blocks its slot.
    Holds,
    /// Cancelled or deleted upstream; the slot is free again.
    Released,
}

/// Removes slots already consumed by confirmed bookings.
pub struct BookingValidityFilter {
    bookings: Arc<dyn BookingStore>,
    provider: Arc<dyn CalendarProvider>,
    tokens: Arc<TokenLifecycleManager>,
    calendar_id: String,
}

impl BookingValidityFilter {
    pub fn new(
        bookings: Arc<dyn BookingStore>,
        provider: Arc<dyn CalendarProvider>,
        tokens: Arc<TokenLifecycleManager>,
    ) -> Self {
        Self { bookings, provider, tokens, calendar_id: DEFAULT_CALENDAR_ID.to_string() }
    }

    /// Calendar the host events are looked up in.
    pub fn with_calendar_id(mut self, calendar_id: impl Into<String>) -> Self {
        self.calendar_id = calendar_id.into();
        self
    }

    /// Subtract the schedule's live bookings from `slots`.
    ///
    /// # Errors
    /// `BookingsUnavailable` when the booking store cannot be read. Failures
    /// while verifying a single booking keep that booking in force.
    #[instrument(skip_all, fields(schedule_id = %schedule.id, candidate_slots = slots.len()))]
    pub async fn apply(
        &self,
        schedule: &Schedule,
        slots: Vec<TimeSlot>,
    ) -> Result<Vec<TimeSlot>, AvailabilityError> {
        let bookings = self.bookings.list_confirmed_bookings(&schedule.id).await.map_err(|err| {
            AvailabilityError::BookingsUnavailable {
                schedule_id: schedule.id.clone(),
                reason: err.to_string(),
            }
        })?;

        let relevant: Vec<ConfirmedBooking> = bookings
            .into_iter()
            .filter(|booking| booking.schedule_id == schedule.id)
            .filter(|booking| schedule.date_range.contains(booking.date))
            .collect();

        if relevant.is_empty() {
            return Ok(slots);
        }

        let checks = relevant.iter().map(|booking| self.verify(schedule, booking));
        let verdicts = join_all(checks).await;

        let live: Vec<ConfirmedBooking> = relevant
            .into_iter()
            .zip(verdicts)
            .filter_map(|(booking, verdict)| (verdict == Verification::Holds).then_some(booking))
            .collect();

        let before = slots.len();
        let remaining = remove_booked(slots, &live);
        debug!(
            live_bookings = live.len(),
            removed = before - remaining.len(),
            "applied confirmed bookings"
        );
        Ok(remaining)
    }

    async fn verify(&self, schedule: &Schedule, booking: &ConfirmedBooking) -> Verification {
        let Some(event_id) = booking.host_calendar_event_id.as_deref() else {
            return Verification::Holds;
        };
        let responsible = booking.assigned_user_id.as_deref().unwrap_or(&schedule.owner_id);

        match self.lookup(responsible, event_id).await {
            Ok(Verification::Released) => {
                info!(
                    event_id,
                    principal_id = responsible,
                    date = %booking.date,
                    "host event gone upstream; releasing booked slot"
                );
                Verification::Released
            }
            Ok(Verification::Holds) => Verification::Holds,
            Err(err) => {
                warn!(error = %err, kind = err.label(), "keeping booking in force");
                Verification::Holds
            }
        }
    }

    async fn lookup(
        &self,
        principal_id: &str,
        event_id: &str,
    ) -> Result<Verification, AvailabilityError> {
        let access_token = self.tokens.valid_access_token(principal_id).await.map_err(|err| {
            AvailabilityError::LiveEventVerificationFailed {
                event_id: event_id.to_string(),
                reason: err.to_string(),
            }
        })?;

        let remote = self
            .provider
            .get_event(&access_token, &self.calendar_id, event_id)
            .await
            .map_err(|err| AvailabilityError::LiveEventVerificationFailed {
                event_id: event_id.to_string(),
                reason: err.to_string(),
            })?;

        Ok(match remote {
            None => Verification::Released,
            Some(event) if event.status == EventStatus::Cancelled => Verification::Released,
            Some(_) => Verification::Holds,
        })
    }
}
