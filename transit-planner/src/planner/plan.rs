//! Request handling: validation, orchestration of the builders, and the
//! planner's error boundary.

use chrono::{Datelike, NaiveDate};
use tracing::{debug, error, warn};

use crate::domain::{DomainError, MINUTES_PER_DAY, StopId, weekday_name};
use crate::loads::{LoadEstimator, LoadMemo, LoadModel};
use crate::network::{NetworkStore, StoreError};

use super::config::PlannerConfig;
use super::context::TripContext;
use super::direct::build_direct;
use super::expand::expand_endpoints;
use super::graph::{NetworkView, ViewOptions};
use super::rank::Priority;
use super::report::{RouteReport, assemble_report};
use super::transfer::build_transfers;

/// Error from planning a trip.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// Origin or destination is not in the network
    #[error("unknown stop {0}")]
    UnknownStop(StopId),

    /// The request itself is malformed
    #[error("invalid plan request: {0}")]
    InvalidRequest(String),

    /// Network data violates an invariant
    #[error("network data is inconsistent: {0}")]
    Integrity(#[from] DomainError),

    /// The store could not be read
    #[error("network store failed: {0}")]
    Store(StoreError),
}

impl From<StoreError> for PlanError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Integrity(e) => PlanError::Integrity(e),
            other => PlanError::Store(other),
        }
    }
}

/// A trip to plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanRequest {
    pub from: StopId,
    pub to: StopId,

    /// Only use low-floor routes.
    pub accessible_only: bool,

    /// Also look for itineraries with one change.
    pub allow_transfers: bool,

    pub priority: Priority,

    /// Departure, minutes since midnight.
    pub departure_mins: u32,

    /// Service date; selects the timetable and the weekday fed to the model.
    pub date: NaiveDate,
}

impl PlanRequest {
    /// A request with transfers allowed, no accessibility filter and the
    /// default priority.
    pub fn new(from: StopId, to: StopId, departure_mins: u32, date: NaiveDate) -> Self {
        Self {
            from,
            to,
            accessible_only: false,
            allow_transfers: true,
            priority: Priority::default(),
            departure_mins,
            date,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_transfers(mut self, allow: bool) -> Self {
        self.allow_transfers = allow;
        self
    }

    pub fn accessible(mut self, only: bool) -> Self {
        self.accessible_only = only;
        self
    }

    pub fn validate(&self) -> Result<(), PlanError> {
        if self.departure_mins >= MINUTES_PER_DAY {
            return Err(PlanError::InvalidRequest(format!(
                "departure {} is outside the day",
                self.departure_mins
            )));
        }
        Ok(())
    }
}

/// Plans trips over a network store, estimating loads with a model.
pub struct Planner<'a, S, M> {
    store: &'a S,
    estimator: &'a LoadEstimator<M>,
    config: &'a PlannerConfig,
}

impl<'a, S: NetworkStore, M: LoadModel> Planner<'a, S, M> {
    pub fn new(store: &'a S, estimator: &'a LoadEstimator<M>, config: &'a PlannerConfig) -> Self {
        Self {
            store,
            estimator,
            config,
        }
    }

    /// Plan a trip.
    ///
    /// No connection is an empty report, not an error. Model trouble only
    /// degrades load estimates to static data.
    pub async fn plan(&self, request: &PlanRequest) -> Result<RouteReport, PlanError> {
        let result = self.run(request).await;
        match &result {
            Err(PlanError::Integrity(e)) => {
                error!(
                    from = %request.from,
                    to = %request.to,
                    error = %e,
                    "network data integrity violation"
                );
            }
            Err(PlanError::Store(e)) => {
                warn!(from = %request.from, to = %request.to, error = %e, "network store failed");
            }
            _ => {}
        }
        result
    }

    async fn run(&self, request: &PlanRequest) -> Result<RouteReport, PlanError> {
        request.validate()?;

        let ends = expand_endpoints(self.store, request.from, request.to).await?;
        let options = ViewOptions {
            accessible_only: request.accessible_only,
            with_transfers: request.allow_transfers,
            date: request.date,
        };
        let view = NetworkView::load(self.store, &ends, options).await?;

        let ctx = TripContext {
            estimator: self.estimator,
            view: &view,
            config: self.config,
            priority: request.priority,
            departure_mins: request.departure_mins,
            weekday: request.date.weekday(),
        };
        // One memo per builder: fallback loads depend on the ridden range
        let mut direct_memo = LoadMemo::new();
        let mut transfer_memo = LoadMemo::new();

        let rides = view.direct_rides(&ends)?;
        let (direct, brief) = build_direct(rides, &ctx, &mut direct_memo).await;
        let transfers = if request.allow_transfers {
            let chains = view.transfer_chains(&ends)?;
            build_transfers(chains, &brief, &ctx, &mut transfer_memo).await
        } else {
            Vec::new()
        };

        let report = assemble_report(self.store, &direct, &transfers).await?;
        debug!(
            from = %request.from,
            to = %request.to,
            weekday = weekday_name(ctx.weekday),
            priority = ?request.priority,
            direct = report.count_simple,
            transfers = report.double_routes.len(),
            estimated_loads = direct_memo.len() + transfer_memo.len(),
            "trip planned"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::cache::{CacheConfig, CachedStore};
    use crate::domain::RouteId;
    use crate::loads::DisabledModel;
    use crate::network::SnapshotStore;
    use crate::planner::report::{RESULT_EMPTY, RESULT_FOUND};
    use crate::testing::{BrokenStore, FailingModel, FixedModel, NetworkBuilder, date};

    /// Stops 1 and 2 share a hub; route 10 runs 1 -> 3, first at 06:00.
    fn hub_network() -> NetworkBuilder {
        NetworkBuilder::new()
            .stop(1, "Square East")
            .stop(2, "Square West")
            .stop(3, "Harbour")
            .hub(100, &[1, 2])
            .crowded_route(10, &[(1, 10.0, 3), (3, 10.0, 0)])
            .timetable(10, "06:00", 30)
    }

    /// Route 10 runs 1 -> 2 -> 3, route 20 runs 4 -> 5 from the hub of 2
    /// and 4, route 30 runs 3 -> 5 from the single-stop hub at 3. No route
    /// reaches 5 from 1 directly.
    fn transfer_network() -> SnapshotStore {
        NetworkBuilder::new()
            .stop(1, "Depot")
            .stop(2, "Square East")
            .stop(3, "Market")
            .stop(4, "Square West")
            .stop(5, "Harbour")
            .hub(100, &[2, 4])
            .hub(200, &[3])
            .route(10, &[(1, 10.0), (2, 10.0), (3, 10.0)])
            .route(20, &[(4, 10.0), (5, 10.0)])
            .route(30, &[(3, 10.0), (5, 10.0)])
            .timetable(10, "06:00", 30)
            .timetable(20, "06:30", 20)
            .timetable(30, "06:40", 20)
            .build()
    }

    fn disabled() -> LoadEstimator<DisabledModel> {
        LoadEstimator::new(DisabledModel, Duration::from_millis(50))
    }

    async fn plan<S: NetworkStore, M: LoadModel>(
        store: &S,
        estimator: &LoadEstimator<M>,
        request: PlanRequest,
    ) -> Result<RouteReport, PlanError> {
        let config = PlannerConfig::default();
        Planner::new(store, estimator, &config).plan(&request).await
    }

    #[tokio::test]
    async fn boarding_from_hub_sibling() {
        let store = hub_network().build();
        // Asked from stop 2, which route 10 does not serve
        let request = PlanRequest::new(StopId(2), StopId(3), 5 * 60 + 50, date());

        let report = plan(&store, &disabled(), request).await.unwrap();
        assert_eq!(report.result, RESULT_FOUND);
        assert_eq!(report.count_simple, 1);
        let simple = &report.simple_routes[0];
        assert_eq!(simple.route_id, RouteId(10));
        assert!(simple.time_begin.contains("06:00"));
        assert_eq!(simple.time_road, "00:30");
    }

    #[tokio::test]
    async fn no_connection_is_empty_report() {
        let store = hub_network().stop(4, "Depot").build();
        let request = PlanRequest::new(StopId(1), StopId(4), 360, date());

        let report = plan(&store, &disabled(), request).await.unwrap();
        assert_eq!(report.result, RESULT_EMPTY);
        assert_eq!(report.count, 0);
    }

    #[tokio::test]
    async fn unknown_stop() {
        let store = hub_network().build();
        let request = PlanRequest::new(StopId(1), StopId(42), 360, date());

        let err = plan(&store, &disabled(), request).await.unwrap_err();
        assert!(matches!(err, PlanError::UnknownStop(StopId(42))));
    }

    #[tokio::test]
    async fn departure_outside_day() {
        let store = hub_network().build();
        let request = PlanRequest::new(StopId(1), StopId(3), MINUTES_PER_DAY, date());

        let err = plan(&store, &disabled(), request).await.unwrap_err();
        assert!(matches!(err, PlanError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn store_failures_are_distinguished() {
        let request = PlanRequest::new(StopId(1), StopId(3), 360, date());

        let err = plan(&BrokenStore::Unavailable, &disabled(), request.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, PlanError::Store(StoreError::Unavailable(_))));

        let err = plan(&BrokenStore::Corrupt, &disabled(), request)
            .await
            .unwrap_err();
        assert!(matches!(err, PlanError::Integrity(_)));
    }

    #[tokio::test]
    async fn accessibility_filter() {
        let request = PlanRequest::new(StopId(1), StopId(3), 360, date()).accessible(true);

        let store = hub_network().build();
        let report = plan(&store, &disabled(), request.clone()).await.unwrap();
        assert!(report.is_empty());

        let store = hub_network().low_floor(10).build();
        let report = plan(&store, &disabled(), request).await.unwrap();
        assert_eq!(report.count_simple, 1);
    }

    #[tokio::test]
    async fn transfers_only_when_allowed() {
        let store = transfer_network();
        let request = PlanRequest::new(StopId(1), StopId(5), 360, date());

        let report = plan(&store, &disabled(), request.clone()).await.unwrap();
        assert_eq!(report.result, RESULT_FOUND);
        assert_eq!(report.count_simple, 0);
        assert_eq!(report.count, 2);
        let first = &report.double_routes[0];
        assert_eq!(first.first.route.route_id, RouteId(10));
        assert_eq!(first.first.stop, "Square East");
        assert_eq!(first.second.stop, "Square West");

        let report = plan(&store, &disabled(), request.with_transfers(false))
            .await
            .unwrap();
        assert_eq!(report.result, RESULT_EMPTY);
        assert!(report.double_routes.is_empty());
    }

    #[tokio::test]
    async fn no_change_at_stop_outside_hub() {
        // Routes 10 and 20 meet at stop 2, which belongs to no hub
        let store = NetworkBuilder::new()
            .stop(1, "Depot")
            .stop(2, "Crossroads")
            .stop(3, "Harbour")
            .route(10, &[(1, 10.0), (2, 0.0)])
            .route(20, &[(2, 10.0), (3, 0.0)])
            .timetable(10, "06:00", 30)
            .timetable(20, "06:00", 30)
            .build();
        let request = PlanRequest::new(StopId(1), StopId(3), 5 * 60 + 50, date());

        let report = plan(&store, &disabled(), request).await.unwrap();
        assert_eq!(report.result, RESULT_EMPTY);
        assert_eq!(report.count, 0);
    }

    #[tokio::test]
    async fn transfer_fallback_load_covers_its_own_leg() {
        // Route 10 is quiet from 1 to 2 and packed from 2 to 3
        let store = NetworkBuilder::new()
            .stop(1, "Depot")
            .stop(2, "Square East")
            .stop(3, "Harbour")
            .stop(4, "Square West")
            .hub(100, &[2, 4])
            .crowded_route(10, &[(1, 1.0, 1), (2, 1.0, 5), (3, 0.0, 0)])
            .route(20, &[(4, 1.0), (3, 0.0)])
            .build();
        let request = PlanRequest::new(StopId(1), StopId(3), 360, date());

        let report = plan(&store, &disabled(), request).await.unwrap();
        assert_eq!(report.simple_routes[0].load.value(), 5);
        let double = &report.double_routes[0];
        assert_eq!(double.first.route.route_id, RouteId(10));
        assert_eq!(double.first.route.load.value(), 1);
    }

    #[tokio::test]
    async fn failing_model_falls_back_to_static_crowding() {
        let store = hub_network().build();
        let request = PlanRequest::new(StopId(1), StopId(3), 360, date());
        let estimator = LoadEstimator::new(FailingModel, Duration::from_millis(50));

        let report = plan(&store, &estimator, request).await.unwrap();
        assert_eq!(report.simple_routes[0].load.value(), 3);
    }

    #[tokio::test]
    async fn model_prediction_is_reported() {
        let store = hub_network().build();
        let request = PlanRequest::new(StopId(1), StopId(3), 360, date());
        let estimator = LoadEstimator::new(
            FixedModel::new().with(10, 1, 14.0),
            Duration::from_millis(200),
        );

        let report = plan(&store, &estimator, request).await.unwrap();
        assert_eq!(report.simple_routes[0].load.value(), 4);
        assert_eq!(estimator.model().calls(), 1);
    }

    #[tokio::test]
    async fn plans_through_cached_store() {
        let store = CachedStore::new(hub_network().build(), &CacheConfig::default());
        let request = PlanRequest::new(StopId(2), StopId(3), 350, date());

        let first = plan(&store, &disabled(), request.clone()).await.unwrap();
        let second = plan(&store, &disabled(), request).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.count_simple, 1);
    }
}
