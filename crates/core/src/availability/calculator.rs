//! Free slots for a single principal

use std::sync::Arc;

use chrono::{DateTime, Days, Duration, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use slotwise_domain::{AvailabilityError, CalendarEvent, DateRange, TimeSlot, WorkingHoursPolicy};
use tracing::{debug, instrument};

use super::aggregator::EventAggregator;
use super::grid::generate_day_grid;
use super::overlap::{overlaps, Interval};
use super::tokens::TokenLifecycleManager;

/// Grid slots of every day in `range` that no busy event overlaps.
///
/// Clock times are interpreted in `tz`. A slot is busy when an event overlaps
/// it on the local wall clock or in absolute time; the latter keeps timed
/// events that a DST fall-back folds onto an empty local interval.
pub fn free_slots(
    events: &[CalendarEvent],
    policy: &WorkingHoursPolicy,
    range: &DateRange,
    tz: Tz,
) -> Vec<TimeSlot> {
    let busy: Vec<BusyWindow> = events.iter().filter_map(|event| BusyWindow::from_event(event, tz)).collect();

    let mut slots = Vec::new();
    for day in range.days() {
        let day_bounds = Interval::whole_day(day);
        let day_instants = query_window(&DateRange::single(day), tz);
        let busy_today: Vec<&BusyWindow> =
            busy.iter().filter(|window| window.blocks(&day_bounds, day_instants)).collect();

        slots.extend(generate_day_grid(day, policy).into_iter().filter(|slot| {
            let local = Interval::from_slot(slot);
            let instants = slot_instants(slot, tz);
            !busy_today.iter().any(|window| window.blocks(&local, instants))
        }));
    }
    slots
}

/// A busy event seen both on the local clock and, when timed, in UTC.
#[derive(Debug, Clone, Copy)]
struct BusyWindow {
    local: Option<Interval>,
    absolute: Option<(DateTime<Utc>, DateTime<Utc>)>,
}

impl BusyWindow {
    fn from_event(event: &CalendarEvent, tz: Tz) -> Option<Self> {
        let local = Some(Interval::from_event(event, tz)).filter(|interval| !interval.is_empty());
        let absolute = event.utc_bounds().filter(|(start, end)| start < end);
        (local.is_some() || absolute.is_some()).then_some(Self { local, absolute })
    }

    fn blocks(&self, local: &Interval, instants: (DateTime<Utc>, DateTime<Utc>)) -> bool {
        self.local.is_some_and(|busy| busy.overlaps(local))
            || self
                .absolute
                .is_some_and(|(start, end)| overlaps(start, end, instants.0, instants.1))
    }
}

/// UTC instants of a slot. Ambiguous wall-clock times take their first
/// occurrence.
fn slot_instants(slot: &TimeSlot, tz: Tz) -> (DateTime<Utc>, DateTime<Utc>) {
    (local_to_utc(tz, slot.local_start(), false), local_to_utc(tz, slot.local_end(), false))
}

/// UTC query window covering every local day of `range`, end of the last day
/// included.
pub fn query_window(range: &DateRange, tz: Tz) -> (DateTime<Utc>, DateTime<Utc>) {
    let first = range.start().and_time(NaiveTime::MIN);
    let after_last = range
        .end()
        .checked_add_days(Days::new(1))
        .map_or(NaiveDateTime::MAX, |day| day.and_time(NaiveTime::MIN));
    (local_to_utc(tz, first, false), local_to_utc(tz, after_last, true))
}

fn local_to_utc(tz: Tz, local: NaiveDateTime, latest: bool) -> DateTime<Utc> {
    let mapped = tz.from_local_datetime(&local);
    let resolved = if latest { mapped.latest() } else { mapped.earliest() };
    match resolved {
        Some(at) => at.with_timezone(&Utc),
        // Midnight skipped by a DST jump: the next hour exists.
        None => local
            .checked_add_signed(Duration::hours(1))
            .and_then(|shifted| tz.from_local_datetime(&shifted).earliest())
            .map_or_else(|| Utc.from_utc_datetime(&local), |at| at.with_timezone(&Utc)),
    }
}

/// Credential, fetch and grid composed for one principal.
pub struct AvailabilityCalculator {
    tokens: Arc<TokenLifecycleManager>,
    aggregator: Arc<EventAggregator>,
}

impl AvailabilityCalculator {
    pub fn new(tokens: Arc<TokenLifecycleManager>, aggregator: Arc<EventAggregator>) -> Self {
        Self { tokens, aggregator }
    }

    pub fn aggregator(&self) -> &EventAggregator {
        &self.aggregator
    }

    pub fn tokens(&self) -> &TokenLifecycleManager {
        &self.tokens
    }

    /// Ordered free slots for `principal_id`, or the reason they are unknown.
    ///
    /// # Errors
    /// Propagates credential failures; calendar fetch failures are absorbed by
    /// the aggregator.
    #[instrument(skip_all, fields(principal_id = %principal_id, start = %range.start(), end = %range.end()))]
    pub async fn availability_for(
        &self,
        principal_id: &str,
        policy: &WorkingHoursPolicy,
        range: &DateRange,
        tz: Tz,
    ) -> Result<Vec<TimeSlot>, AvailabilityError> {
        let access_token = self.tokens.valid_access_token(principal_id).await?;
        let (time_min, time_max) = query_window(range, tz);

        let events = self.aggregator.fetch_busy_events(&access_token, time_min, time_max).await;
        let slots = free_slots(&events, policy, range, tz);

        debug!(busy_events = events.len(), free_slots = slots.len(), "computed principal availability");
        Ok(slots)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, NaiveDate};
    use slotwise_domain::{BreakWindow, EventTime};

    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn standard_policy() -> WorkingHoursPolicy {
        let lunch = BreakWindow { start: t(12, 0), end: t(13, 0) };
        WorkingHoursPolicy::new(t(9, 0), t(18, 0), Some(lunch), 60).unwrap()
    }

    fn timed(id: &str, day: u32, from: (u32, u32), to: (u32, u32)) -> CalendarEvent {
        let utc = FixedOffset::east_opt(0).unwrap();
        let start = utc.with_ymd_and_hms(2024, 6, day, from.0, from.1, 0).unwrap();
        let end = utc.with_ymd_and_hms(2024, 6, day, to.0, to.1, 0).unwrap();
        CalendarEvent::new(id, None, EventTime::DateTime(start), EventTime::DateTime(end)).unwrap()
    }

    fn starts(slots: &[TimeSlot]) -> Vec<String> {
        slots.iter().map(|s| format!("{} {}", s.date(), s.start_time().format("%H:%M"))).collect()
    }

    #[test]
    fn busy_event_inside_break_changes_nothing() {
        let range = DateRange::single(d(10));
        let baseline = free_slots(&[], &standard_policy(), &range, Tz::UTC);
        let with_event =
            free_slots(&[timed("errand", 10, (12, 15), (12, 45))], &standard_policy(), &range, Tz::UTC);

        assert_eq!(baseline.len(), 8);
        assert_eq!(with_event, baseline);
    }

    #[test]
    fn busy_event_straddling_break_end_blocks_following_slot() {
        let range = DateRange::single(d(10));
        let slots =
            free_slots(&[timed("lunch-run", 10, (12, 30), (13, 30))], &standard_policy(), &range, Tz::UTC);

        assert_eq!(slots.len(), 7);
        assert!(slots.iter().all(|s| s.start_time() != t(13, 0)));
        assert!(slots.iter().any(|s| s.start_time() == t(14, 0)));
    }

    #[test]
    fn busy_event_only_blocks_its_own_day() {
        let range = DateRange::new(d(10), d(11)).unwrap();
        let slots = free_slots(&[timed("standup", 11, (9, 0), (10, 0))], &standard_policy(), &range, Tz::UTC);

        let starts = starts(&slots);
        assert!(starts.contains(&"2024-06-10 09:00".to_string()));
        assert!(!starts.contains(&"2024-06-11 09:00".to_string()));
        assert_eq!(slots.len(), 15);
    }

    #[test]
    fn all_day_event_blocks_whole_day() {
        let range = DateRange::new(d(10), d(11)).unwrap();
        let holiday =
            CalendarEvent::new("holiday", None, EventTime::Date(d(10)), EventTime::Date(d(11))).unwrap();

        let slots = free_slots(&[holiday], &standard_policy(), &range, Tz::UTC);

        assert!(slots.iter().all(|s| s.date() == d(11)));
        assert_eq!(slots.len(), 8);
    }

    #[test]
    fn event_is_read_in_schedule_zone() {
        // 16:00-17:00 UTC is 09:00-10:00 in Los Angeles (PDT) on 2024-06-10.
        let range = DateRange::single(d(10));
        let tz: Tz = "America/Los_Angeles".parse().unwrap();
        let slots = free_slots(&[timed("call", 10, (16, 0), (17, 0))], &standard_policy(), &range, tz);

        assert!(slots.iter().all(|s| s.start_time() != t(9, 0)));
        assert_eq!(slots.len(), 7);
    }

    #[test]
    fn event_folded_by_fall_back_still_blocks_its_slot() {
        // 05:00-06:00 UTC on 2024-11-03 is 01:00 EDT to 01:00 EST in New York.
        let tz: Tz = "America/New_York".parse().unwrap();
        let day = NaiveDate::from_ymd_opt(2024, 11, 3).unwrap();
        let utc = FixedOffset::east_opt(0).unwrap();
        let meeting = CalendarEvent::new(
            "late-sync",
            None,
            EventTime::DateTime(utc.with_ymd_and_hms(2024, 11, 3, 5, 0, 0).unwrap()),
            EventTime::DateTime(utc.with_ymd_and_hms(2024, 11, 3, 6, 0, 0).unwrap()),
        )
        .unwrap();
        let night = WorkingHoursPolicy::new(t(0, 0), t(4, 0), None, 60).unwrap();

        let slots = free_slots(&[meeting], &night, &DateRange::single(day), tz);

        let starts: Vec<NaiveTime> = slots.iter().map(TimeSlot::start_time).collect();
        assert_eq!(starts, vec![t(0, 0), t(2, 0), t(3, 0)]);
    }

    #[test]
    fn query_window_spans_whole_local_days() {
        let range = DateRange::new(d(10), d(12)).unwrap();
        let (min, max) = query_window(&range, Tz::UTC);
        assert_eq!(min, Utc.with_ymd_and_hms(2024, 6, 10, 0, 0, 0).unwrap());
        assert_eq!(max, Utc.with_ymd_and_hms(2024, 6, 13, 0, 0, 0).unwrap());

        let tz: Tz = "Europe/Berlin".parse().unwrap();
        let (min, max) = query_window(&DateRange::single(d(10)), tz);
        assert_eq!(min, Utc.with_ymd_and_hms(2024, 6, 9, 22, 0, 0).unwrap());
        assert_eq!(max, Utc.with_ymd_and_hms(2024, 6, 10, 22, 0, 0).unwrap());
    }
}
