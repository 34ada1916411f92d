//! Timetable-based departure and ride estimates.
//!
//! A timetable entry says when a vehicle leaves the first stop and how long
//! one lap of the route takes. Segment weights split the lap, so the time the
//! vehicle reaches stop `home` is `start + lap * before / total`.

use crate::domain::{SliceWeights, TimetableEntry};

/// Estimated departure and ride for one leg, in minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Schedule {
    /// When the vehicle reaches the boarding stop.
    pub begin: f64,
    /// Time on board.
    pub ride: f64,
    /// Wait at the stop plus ride.
    pub total: f64,
}

impl Schedule {
    /// When the rider reaches the alighting stop.
    pub fn arrival(&self) -> f64 {
        self.begin + self.ride
    }
}

/// First departure from the boarding stop at or after `departure`.
///
/// `entries` must be ascending by start time and already restricted to the
/// planning date. Returns `None` when no entry reaches the stop in time, or
/// when the route has no usable total weight.
pub fn estimate_schedule(
    entries: &[TimetableEntry],
    departure: f64,
    weights: SliceWeights,
) -> Option<Schedule> {
    if !weights.total.is_finite() || weights.total <= 0.0 {
        return None;
    }

    let before_share = weights.before / weights.total;
    let leg_share = weights.leg / weights.total;

    entries.iter().find_map(|entry| {
        let lap = f64::from(entry.headway_mins);
        let begin = f64::from(entry.start.minutes()) + lap * before_share;
        if begin < departure {
            return None;
        }
        let ride = lap * leg_share;
        Some(Schedule {
            begin,
            ride,
            total: begin - departure + ride,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RouteId, TimeOfDay};
    use proptest::prelude::*;

    fn entry(start: &str, lap: u32) -> TimetableEntry {
        TimetableEntry {
            route: RouteId(1),
            start: TimeOfDay::parse(start).unwrap(),
            headway_mins: lap,
            day: None,
        }
    }

    fn weights(before: f64, leg: f64, total: f64) -> SliceWeights {
        SliceWeights { before, leg, total }
    }

    #[test]
    fn boarding_at_first_stop() {
        let entries = [entry("08:00", 60)];
        let schedule = estimate_schedule(&entries, 470.0, weights(0.0, 30.0, 60.0)).unwrap();

        assert_eq!(schedule.begin, 480.0);
        assert_eq!(schedule.ride, 30.0);
        assert_eq!(schedule.total, 40.0);
        assert_eq!(schedule.arrival(), 510.0);
    }

    #[test]
    fn boarding_part_way_along() {
        let entries = [entry("06:00", 40)];
        // A quarter of the lap before boarding, half of it on board
        let schedule = estimate_schedule(&entries, 360.0, weights(5.0, 10.0, 20.0)).unwrap();

        assert_eq!(schedule.begin, 370.0);
        assert_eq!(schedule.ride, 20.0);
        assert_eq!(schedule.total, 30.0);
    }

    #[test]
    fn skips_departed_services() {
        let entries = [entry("06:00", 30), entry("07:00", 30), entry("08:00", 30)];
        let schedule = estimate_schedule(&entries, 425.0, weights(0.0, 15.0, 30.0)).unwrap();
        assert_eq!(schedule.begin, 480.0);
    }

    #[test]
    fn begin_equal_to_departure_qualifies() {
        let entries = [entry("08:00", 60)];
        let schedule = estimate_schedule(&entries, 480.0, weights(0.0, 30.0, 60.0)).unwrap();
        assert_eq!(schedule.total, 30.0);
    }

    #[test]
    fn infeasible_when_all_departed() {
        let entries = [entry("06:00", 30), entry("07:00", 30)];
        assert_eq!(
            estimate_schedule(&entries, 600.0, weights(0.0, 15.0, 30.0)),
            None
        );
    }

    #[test]
    fn infeasible_without_entries() {
        assert_eq!(estimate_schedule(&[], 0.0, weights(0.0, 1.0, 2.0)), None);
    }

    #[test]
    fn infeasible_with_degenerate_total() {
        let entries = [entry("08:00", 60)];
        assert_eq!(
            estimate_schedule(&entries, 0.0, weights(0.0, 0.0, 0.0)),
            None
        );
        assert_eq!(
            estimate_schedule(&entries, 0.0, weights(0.0, 1.0, f64::NAN)),
            None
        );
    }

    proptest! {
        #[test]
        fn never_departs_before_request(
            starts in prop::collection::vec(0u32..1440, 1..10),
            lap in 1u32..120,
            before in 0.0f64..50.0,
            leg in 0.1f64..50.0,
            departure in 0.0f64..1440.0,
        ) {
            let mut starts = starts;
            starts.sort();
            let entries: Vec<TimetableEntry> = starts
                .iter()
                .map(|&m| TimetableEntry {
                    route: RouteId(1),
                    start: TimeOfDay::from_minutes(m).unwrap(),
                    headway_mins: lap,
                    day: None,
                })
                .collect();
            let total = before + leg + 1.0;

            if let Some(schedule) =
                estimate_schedule(&entries, departure, weights(before, leg, total))
            {
                prop_assert!(schedule.begin >= departure);
                prop_assert!(schedule.ride > 0.0);
                prop_assert!(schedule.total >= schedule.ride);
            }
        }
    }
}
