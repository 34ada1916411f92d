//! Per-request evaluation context shared by the itinerary builders.

use chrono::Weekday;

use crate::domain::LoadClass;
use crate::loads::{LoadEstimator, LoadMemo, LoadModel, LoadQuery};

use super::config::PlannerConfig;
use super::graph::{NetworkView, Ride};
use super::rank::Priority;
use super::timing::{Schedule, estimate_schedule};

/// Everything a builder needs to turn rides into ranked candidates.
pub struct TripContext<'r, M> {
    pub estimator: &'r LoadEstimator<M>,
    pub view: &'r NetworkView,
    pub config: &'r PlannerConfig,
    pub priority: Priority,
    /// Requested departure, minutes since midnight.
    pub departure_mins: u32,
    pub weekday: Weekday,
}

impl<M: LoadModel> TripContext<'_, M> {
    /// Expected load boarding `ride`, memoized per (route, boarding stop).
    pub async fn load(&self, ride: &Ride, memo: &mut LoadMemo) -> LoadClass {
        let query = LoadQuery {
            line: &ride.line,
            boarding_order: ride.slice.home(),
            alighting_order: ride.slice.end(),
            stop: ride.boarding_stop(),
            departure_mins: i64::from(self.departure_mins),
            weekday: self.weekday,
        };
        self.estimator.estimate(&query, memo).await
    }

    /// Next timetabled departure for `ride` at or after `departure`.
    pub fn schedule(&self, ride: &Ride, departure: f64) -> Option<Schedule> {
        let weights = ride.line.slice_weights(&ride.slice);
        estimate_schedule(self.view.timetable(ride.route()), departure, weights)
    }

    /// Requested departure as fractional minutes.
    pub fn departure(&self) -> f64 {
        f64::from(self.departure_mins)
    }
}
