//! Network store trait and its error type.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::{
    DomainError, Geometry, GeometryId, HubId, RouteId, RouteLine, Stop, StopId, TimetableEntry,
};

/// Errors from a network store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading a snapshot file failed
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot JSON did not parse
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Backing service could not be reached
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Stored data violates a network invariant
    #[error("integrity violation: {0}")]
    Integrity(#[from] DomainError),
}

/// Trait for read access to the transit network.
///
/// This abstraction allows the planner to be tested with in-memory data.
/// Lookups of unknown ids skip them rather than failing; absence is the
/// caller's business.
#[allow(async_fn_in_trait)]
pub trait NetworkStore {
    /// Get stops by id.
    async fn stops(&self, ids: &[StopId]) -> Result<Vec<Stop>, StoreError>;

    /// Get every stop belonging to any of `hubs`.
    async fn hub_stops(&self, hubs: &[HubId]) -> Result<Vec<Stop>, StoreError>;

    /// Get ids of routes with at least one segment at one of `stops`.
    ///
    /// Inactive routes are included; filtering is the planner's job.
    async fn routes_serving(&self, stops: &[StopId]) -> Result<Vec<RouteId>, StoreError>;

    /// Get routes with their ordered segments.
    async fn route_lines(&self, routes: &[RouteId]) -> Result<Vec<Arc<RouteLine>>, StoreError>;

    /// Get the timetable entries of `route` that run on `date`,
    /// ascending by start time.
    async fn timetable(
        &self,
        route: RouteId,
        date: NaiveDate,
    ) -> Result<Vec<TimetableEntry>, StoreError>;

    /// Get geometry polylines by id.
    async fn geometries(&self, ids: &[GeometryId]) -> Result<Vec<Geometry>, StoreError>;
}
