//! Evaluated itinerary candidates.

use std::collections::HashMap;

use crate::domain::{LoadClass, RouteId, format_clock};

use super::graph::Ride;
use super::rank::{
    NO_DEPARTURE_MINUTES, Priority, RankKey, Ranked, weighted_minutes, whole_minutes,
};
use super::timing::Schedule;

/// Label for legs with a timetabled departure.
pub const LABEL_SCHEDULED: &str = "By schedule";

/// Label for legs with nothing left to catch today.
pub const LABEL_NO_DEPARTURES: &str = "No departures";

/// Placeholder shown instead of a time.
const NO_TIME: &str = "-";

/// Route -> slice length of its best direct ride.
pub type RouteBrief = HashMap<RouteId, u32>;

/// One ride with its estimated load and schedule.
#[derive(Debug, Clone)]
pub struct LegEstimate {
    pub ride: Ride,
    pub load: LoadClass,
    pub schedule: Option<Schedule>,
}

impl LegEstimate {
    pub fn slice_len(&self) -> u32 {
        self.ride.slice.len()
    }

    pub fn time_label(&self) -> &'static str {
        match self.schedule {
            Some(_) => LABEL_SCHEDULED,
            None => LABEL_NO_DEPARTURES,
        }
    }

    /// Departure from the boarding stop, e.g. "at 06:10".
    pub fn time_begin(&self) -> String {
        match &self.schedule {
            Some(s) => format!("at {}", format_clock(s.begin)),
            None => NO_TIME.to_string(),
        }
    }

    /// Time on board as "HH:MM".
    pub fn time_road(&self) -> String {
        match &self.schedule {
            Some(s) => format_clock(s.ride),
            None => NO_TIME.to_string(),
        }
    }
}

/// A single-route itinerary.
#[derive(Debug, Clone)]
pub struct DirectCandidate {
    pub leg: LegEstimate,
    /// Wait plus ride, or the sentinel.
    pub total_mins: i64,
    /// Crowding-weighted trip time, or the sentinel.
    pub weighted_mins: i64,
}

impl DirectCandidate {
    pub fn new(leg: LegEstimate, balance_penalty: f64) -> Self {
        let (total_mins, weighted_mins) = match &leg.schedule {
            Some(s) => (
                whole_minutes(s.total),
                whole_minutes(weighted_minutes(s.total, s.ride, leg.load, balance_penalty)),
            ),
            None => (NO_DEPARTURE_MINUTES, NO_DEPARTURE_MINUTES),
        };
        Self {
            leg,
            total_mins,
            weighted_mins,
        }
    }

    pub fn route(&self) -> RouteId {
        self.leg.ride.route()
    }
}

impl Ranked for DirectCandidate {
    fn rank_key(&self, priority: Priority) -> RankKey {
        let load = i64::from(self.leg.load.value());
        let len = i64::from(self.leg.slice_len());
        match priority {
            Priority::Load => [load, self.total_mins, len, 0, 0, 0],
            Priority::Time => [self.total_mins, load, len, 0, 0, 0],
            Priority::Balance => [self.weighted_mins, load, len, 0, 0, 0],
        }
    }
}

/// A two-route itinerary.
#[derive(Debug, Clone)]
pub struct TransferCandidate {
    pub first: LegEstimate,
    pub second: LegEstimate,
    /// The busier of the two legs.
    pub max_load: LoadClass,
    /// From the requested departure to arrival, including the transfer
    /// buffer, or the sentinel.
    pub total_mins: i64,
    pub weighted_mins: i64,
}

impl TransferCandidate {
    /// Combine two evaluated legs. The trip is feasible only when both legs are.
    pub fn new(
        first: LegEstimate,
        second: LegEstimate,
        transfer_buffer_mins: f64,
        balance_penalty: f64,
    ) -> Self {
        let max_load = first.load.max(second.load);
        let (total_mins, weighted_mins) = match (&first.schedule, &second.schedule) {
            (Some(a), Some(b)) => {
                let total = a.total + transfer_buffer_mins + b.total;
                let ride = a.ride + b.ride;
                (
                    whole_minutes(total),
                    whole_minutes(weighted_minutes(total, ride, max_load, balance_penalty)),
                )
            }
            _ => (NO_DEPARTURE_MINUTES, NO_DEPARTURE_MINUTES),
        };
        Self {
            first,
            second,
            max_load,
            total_mins,
            weighted_mins,
        }
    }

    pub fn routes(&self) -> (RouteId, RouteId) {
        (self.first.ride.route(), self.second.ride.route())
    }

    /// Whether either leg rides its route further than the route's best
    /// direct ride does.
    pub fn exceeds_brief(&self, brief: &RouteBrief) -> bool {
        [&self.first, &self.second].into_iter().any(|leg| {
            brief
                .get(&leg.ride.route())
                .is_some_and(|&best| leg.slice_len() > best)
        })
    }
}

impl Ranked for TransferCandidate {
    fn rank_key(&self, priority: Priority) -> RankKey {
        let max = i64::from(self.max_load.value());
        let load1 = i64::from(self.first.load.value());
        let load2 = i64::from(self.second.load.value());
        let len1 = i64::from(self.first.slice_len());
        let len2 = i64::from(self.second.slice_len());
        match priority {
            Priority::Load => [max, load1, load2, len1, len2, self.total_mins],
            Priority::Time => [self.total_mins, max, load1, load2, len1, len2],
            Priority::Balance => [self.weighted_mins, max, load1, load2, len1, len2],
        }
    }
}
