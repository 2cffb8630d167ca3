//! Daily slot grid generation

use chrono::{Duration, NaiveDate};
use slotwise_domain::{TimeSlot, WorkingHoursPolicy};

use super::overlap::overlaps;

/// Candidate slots for one day under `policy`, in start order.
///
/// Slots step from `work_start` by the slot duration; a slot that would spill
/// past `work_end` is dropped rather than truncated, as is any slot touching
/// the break with a non-empty overlap.
pub fn generate_day_grid(date: NaiveDate, policy: &WorkingHoursPolicy) -> Vec<TimeSlot> {
    let step = Duration::minutes(i64::from(policy.slot_duration_minutes()));
    let work_end = policy.work_end();
    let mut slots = Vec::new();
    let mut cursor = policy.work_start();

    loop {
        // `overflowing_add_signed` wraps at midnight; a non-zero wrap means the
        // slot would run into the next day.
        let (slot_end, wrapped) = cursor.overflowing_add_signed(step);
        if wrapped != 0 || slot_end > work_end || slot_end <= cursor {
            break;
        }

        let in_break = policy
            .break_window()
            .is_some_and(|window| overlaps(cursor, slot_end, window.start, window.end));

        if !in_break {
            if let Ok(slot) = TimeSlot::new(date, cursor, slot_end) {
                slots.push(slot);
            }
        }

        cursor = slot_end;
    }

    slots
}
