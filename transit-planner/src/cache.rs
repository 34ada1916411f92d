//! Caching layer for network store responses.
//!
//! Route lines and timetables change only when an operator edits the
//! network, yet every planning request reads them. We cache both for a
//! short TTL so repeated requests between the same stops skip the store.
//! Everything else is passed straight through.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use moka::future::Cache as MokaCache;
use tracing::trace;

use crate::domain::{Geometry, GeometryId, HubId, RouteId, RouteLine, Stop, StopId, TimetableEntry};
use crate::network::{NetworkStore, StoreError};

/// Cache key for timetables: (route, service date).
type TimetableKey = (RouteId, NaiveDate);

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries per table.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            max_capacity: 10_000,
        }
    }
}

/// Network store with caching.
///
/// Wraps any `NetworkStore` and caches route lines and timetables.
pub struct CachedStore<S> {
    inner: S,
    lines: MokaCache<RouteId, Arc<RouteLine>>,
    timetables: MokaCache<TimetableKey, Arc<Vec<TimetableEntry>>>,
}

impl<S: NetworkStore> CachedStore<S> {
    /// Create a new cached store.
    pub fn new(inner: S, config: &CacheConfig) -> Self {
        let lines = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();
        let timetables = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            inner,
            lines,
            timetables,
        }
    }

    /// Access the underlying store for operations that bypass cache.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.lines.invalidate_all();
        self.timetables.invalidate_all();
    }
}

impl<S: NetworkStore> NetworkStore for CachedStore<S> {
    async fn stops(&self, ids: &[StopId]) -> Result<Vec<Stop>, StoreError> {
        self.inner.stops(ids).await
    }

    async fn hub_stops(&self, hubs: &[HubId]) -> Result<Vec<Stop>, StoreError> {
        self.inner.hub_stops(hubs).await
    }

    async fn routes_serving(&self, stops: &[StopId]) -> Result<Vec<RouteId>, StoreError> {
        self.inner.routes_serving(stops).await
    }

    async fn route_lines(&self, routes: &[RouteId]) -> Result<Vec<Arc<RouteLine>>, StoreError> {
        let mut found = Vec::with_capacity(routes.len());
        let mut missing = Vec::new();

        for id in routes {
            match self.lines.get(id).await {
                Some(line) => found.push(line),
                None => missing.push(*id),
            }
        }

        if !missing.is_empty() {
            trace!(missing = missing.len(), "route line cache miss");
            for line in self.inner.route_lines(&missing).await? {
                self.lines.insert(line.id(), line.clone()).await;
                found.push(line);
            }
        }

        // Keep the caller's order
        found.sort_by_key(|line| routes.iter().position(|id| *id == line.id()));
        Ok(found)
    }

    async fn timetable(
        &self,
        route: RouteId,
        date: NaiveDate,
    ) -> Result<Vec<TimetableEntry>, StoreError> {
        let key = (route, date);

        if let Some(cached) = self.timetables.get(&key).await {
            return Ok(cached.as_ref().clone());
        }

        let entries = self.inner.timetable(route, date).await?;
        self.timetables
            .insert(key, Arc::new(entries.clone()))
            .await;

        Ok(entries)
    }

    async fn geometries(&self, ids: &[GeometryId]) -> Result<Vec<Geometry>, StoreError> {
        self.inner.geometries(ids).await
    }
}
