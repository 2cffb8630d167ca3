//! Multi-party intersection: teams and host+guest

use std::collections::HashSet;
use std::sync::Arc;

use chrono_tz::Tz;
use futures::future::join_all;
use slotwise_domain::{AvailabilityError, DateRange, Principal, Team, TimeSlot, WorkingHoursPolicy};
use tracing::{debug, instrument, warn};

use super::calculator::AvailabilityCalculator;

/// Slots of `first` that also appear in `second`, in `first`'s order.
///
/// Membership is the exact `(date, start, end)` triple, not containment.
pub fn intersect(first: &[TimeSlot], second: &[TimeSlot]) -> Vec<TimeSlot> {
    let lookup: HashSet<&TimeSlot> = second.iter().collect();
    first.iter().filter(|slot| lookup.contains(slot)).copied().collect()
}

/// Fold [`intersect`] over every set, keeping the first set's order.
///
/// An empty input yields an empty result.
pub fn intersect_slot_sets<S: AsRef<[TimeSlot]>>(sets: &[S]) -> Vec<TimeSlot> {
    let Some((first, rest)) = sets.split_first() else {
        return Vec::new();
    };
    rest.iter().fold(first.as_ref().to_vec(), |acc, set| intersect(&acc, set.as_ref()))
}

/// Host (or team) slots narrowed by an optional guest result.
///
/// Returns the slots and whether the guest was taken into account. A guest
/// whose availability is unknown is ignored rather than failing the request.
pub fn combine_with_guest(
    host: Vec<TimeSlot>,
    guest: Option<Result<Vec<TimeSlot>, AvailabilityError>>,
) -> (Vec<TimeSlot>, bool) {
    match guest {
        Some(Ok(guest_slots)) => (intersect(&host, &guest_slots), true),
        Some(Err(err)) => {
            warn!(error = %err, kind = err.label(), "guest availability unknown; using host slots");
            (host, false)
        }
        None => (host, false),
    }
}

/// Availability of users and all-or-nothing teams.
pub struct TeamAvailability {
    calculator: Arc<AvailabilityCalculator>,
}

impl TeamAvailability {
    pub fn new(calculator: Arc<AvailabilityCalculator>) -> Self {
        Self { calculator }
    }

    /// Free slots for a user, or the common free slots of a team.
    pub async fn for_principal(
        &self,
        principal: &Principal,
        policy: &WorkingHoursPolicy,
        range: &DateRange,
        tz: Tz,
    ) -> Result<Vec<TimeSlot>, AvailabilityError> {
        match principal {
            Principal::User { id } => self.calculator.availability_for(id, policy, range, tz).await,
            Principal::Team(team) => self.for_team(team, policy, range, tz).await,
        }
    }

    /// Intersection of every member's availability.
    ///
    /// # Errors
    /// `TeamPartialUnknown` when any member's availability is unknown; a
    /// smaller intersection of the remaining members is never returned.
    /// `EmptyTeam` when the team has no members.
    #[instrument(skip_all, fields(team_id = %team.id, members = team.member_ids.len()))]
    pub async fn for_team(
        &self,
        team: &Team,
        policy: &WorkingHoursPolicy,
        range: &DateRange,
        tz: Tz,
    ) -> Result<Vec<TimeSlot>, AvailabilityError> {
        if team.member_ids.is_empty() {
            return Err(AvailabilityError::EmptyTeam { team_id: team.id.clone() });
        }

        let lookups = team
            .member_ids
            .iter()
            .map(|member_id| self.calculator.availability_for(member_id, policy, range, tz));
        let results = join_all(lookups).await;

        let mut known = Vec::with_capacity(results.len());
        let mut unknown_members = Vec::new();
        for (member_id, result) in team.member_ids.iter().zip(results) {
            match result {
                Ok(slots) => known.push(slots),
                Err(err) => {
                    warn!(member_id = %member_id, error = %err, "team member availability unknown");
                    unknown_members.push(member_id.clone());
                }
            }
        }

        if !unknown_members.is_empty() || known.len() != team.member_ids.len() {
            return Err(AvailabilityError::TeamPartialUnknown { unknown_members });
        }

        let slots = intersect_slot_sets(&known);
        debug!(common_slots = slots.len(), "intersected team availability");
        Ok(slots)
    }
}
