//! In-memory network store backed by a JSON snapshot.
//!
//! Serves a fixed network as if it were the live store. Useful for the
//! command-line tool, for development, and for tests.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{
    DomainError, Geometry, GeometryId, Hub, HubId, Route, RouteId, RouteLine, Segment, Stop,
    StopId, TimetableEntry,
};

use super::store::{NetworkStore, StoreError};

/// Serialized form of a whole network.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    pub stops: Vec<Stop>,
    #[serde(default)]
    pub hubs: Vec<Hub>,
    pub routes: Vec<Route>,
    pub segments: Vec<Segment>,
    #[serde(default)]
    pub geometries: Vec<Geometry>,
    #[serde(default)]
    pub timetables: Vec<TimetableEntry>,
}

/// Network store that serves a snapshot from memory.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    stops: HashMap<StopId, Stop>,
    hubs: HashMap<HubId, Hub>,
    lines: BTreeMap<RouteId, Arc<RouteLine>>,
    /// Stop -> routes with a segment there, ascending.
    serving: HashMap<StopId, Vec<RouteId>>,
    geometries: HashMap<GeometryId, Geometry>,
    /// Route -> entries, ascending by start.
    timetables: HashMap<RouteId, Vec<TimetableEntry>>,
}

impl SnapshotStore {
    /// Build a store from a snapshot, validating cross references and
    /// segment ordering.
    pub fn from_snapshot(snapshot: NetworkSnapshot) -> Result<Self, StoreError> {
        let stops: HashMap<StopId, Stop> = snapshot.stops.into_iter().map(|s| (s.id, s)).collect();
        let hubs: HashMap<HubId, Hub> = snapshot.hubs.into_iter().map(|h| (h.id, h)).collect();

        let mut grouped: BTreeMap<RouteId, Vec<Segment>> = snapshot
            .routes
            .iter()
            .map(|r| (r.id, Vec::new()))
            .collect();

        for segment in snapshot.segments {
            if !stops.contains_key(&segment.stop) {
                return Err(DomainError::UnknownStop {
                    route: segment.route,
                    order: segment.order,
                    stop: segment.stop,
                }
                .into());
            }
            grouped
                .get_mut(&segment.route)
                .ok_or(DomainError::UnknownRoute(segment.route))?
                .push(segment);
        }

        let mut lines = BTreeMap::new();
        let mut serving: HashMap<StopId, Vec<RouteId>> = HashMap::new();
        for route in snapshot.routes {
            let segments = grouped.remove(&route.id).unwrap_or_default();
            let line = RouteLine::new(route, segments)?;

            let served: HashSet<StopId> = line.segments().iter().map(|s| s.stop).collect();
            for stop in served {
                serving.entry(stop).or_default().push(line.id());
            }
            lines.insert(line.id(), Arc::new(line));
        }
        for routes in serving.values_mut() {
            routes.sort();
        }

        let mut timetables: HashMap<RouteId, Vec<TimetableEntry>> = HashMap::new();
        for entry in snapshot.timetables {
            if !lines.contains_key(&entry.route) {
                return Err(DomainError::UnknownRoute(entry.route).into());
            }
            timetables.entry(entry.route).or_default().push(entry);
        }
        for entries in timetables.values_mut() {
            entries.sort_by_key(|e| e.start);
        }

        let geometries = snapshot
            .geometries
            .into_iter()
            .map(|g| (g.id, g))
            .collect();

        Ok(Self {
            stops,
            hubs,
            lines,
            serving,
            geometries,
            timetables,
        })
    }

    /// Parse a snapshot from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let snapshot: NetworkSnapshot = serde_json::from_str(json)?;
        Self::from_snapshot(snapshot)
    }

    /// Load a snapshot from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Number of routes in the snapshot.
    pub fn route_count(&self) -> usize {
        self.lines.len()
    }

    /// Number of stops in the snapshot.
    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }

    /// Look up a hub record.
    pub fn hub(&self, id: HubId) -> Option<&Hub> {
        self.hubs.get(&id)
    }
}

impl NetworkStore for SnapshotStore {
    async fn stops(&self, ids: &[StopId]) -> Result<Vec<Stop>, StoreError> {
        Ok(ids
            .iter()
            .filter_map(|id| self.stops.get(id))
            .cloned()
            .collect())
    }

    async fn hub_stops(&self, hubs: &[HubId]) -> Result<Vec<Stop>, StoreError> {
        let mut found: Vec<Stop> = self
            .stops
            .values()
            .filter(|s| s.hub.is_some_and(|h| hubs.contains(&h)))
            .cloned()
            .collect();
        found.sort_by_key(|s| s.id);
        Ok(found)
    }

    async fn routes_serving(&self, stops: &[StopId]) -> Result<Vec<RouteId>, StoreError> {
        let mut routes: Vec<RouteId> = stops
            .iter()
            .filter_map(|s| self.serving.get(s))
            .flatten()
            .copied()
            .collect();
        routes.sort();
        routes.dedup();
        Ok(routes)
    }

    async fn route_lines(&self, routes: &[RouteId]) -> Result<Vec<Arc<RouteLine>>, StoreError> {
        Ok(routes
            .iter()
            .filter_map(|id| self.lines.get(id))
            .cloned()
            .collect())
    }

    async fn timetable(
        &self,
        route: RouteId,
        date: NaiveDate,
    ) -> Result<Vec<TimetableEntry>, StoreError> {
        Ok(self
            .timetables
            .get(&route)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|e| e.applies_on(date))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn geometries(&self, ids: &[GeometryId]) -> Result<Vec<Geometry>, StoreError> {
        Ok(ids
            .iter()
            .filter_map(|id| self.geometries.get(id))
            .cloned()
            .collect())
    }
}
