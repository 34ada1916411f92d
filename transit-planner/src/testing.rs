//! Test fixtures: a fluent network builder and fake collaborators.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::NaiveDate;

use crate::domain::{
    Coord, DomainError, Geometry, GeometryId, Hub, HubId, LoadClass, Route, RouteId, RouteLine,
    Segment, Stop, StopId, TimeOfDay, TimetableEntry,
};
use crate::loads::{LoadModel, ModelError, PredictionQuery};
use crate::network::{NetworkSnapshot, NetworkStore, SnapshotStore, StoreError};

/// The planning date used throughout the tests (a Friday).
pub fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
}

/// Builds small networks for tests.
#[derive(Debug, Default)]
pub struct NetworkBuilder {
    snapshot: NetworkSnapshot,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stop with a coordinate derived from its id.
    pub fn stop(self, id: u32, name: &str) -> Self {
        let coord = Coord::new(55.0 + f64::from(id) / 100.0, 37.0 + f64::from(id) / 100.0);
        self.stop_at(id, name, coord)
    }

    pub fn stop_at(mut self, id: u32, name: &str, coord: Coord) -> Self {
        self.snapshot.stops.push(Stop {
            id: StopId(id),
            name: name.to_string(),
            coord,
            hub: None,
        });
        self
    }

    /// Add a hub and move the given stops into it.
    pub fn hub(mut self, id: u32, members: &[u32]) -> Self {
        self.snapshot.hubs.push(Hub {
            id: HubId(id),
            name: format!("Hub {id}"),
        });
        for stop in &mut self.snapshot.stops {
            if members.contains(&stop.id.0) {
                stop.hub = Some(HubId(id));
            }
        }
        self
    }

    /// Add an active route through `stops` as (stop, weight), orders from 0.
    pub fn route(self, id: u32, stops: &[(u32, f64)]) -> Self {
        let crowded: Vec<(u32, f64, u8)> = stops.iter().map(|&(s, w)| (s, w, 0)).collect();
        self.crowded_route(id, &crowded)
    }

    /// Add an active route through `stops` as (stop, weight, crowding).
    pub fn crowded_route(mut self, id: u32, stops: &[(u32, f64, u8)]) -> Self {
        self.snapshot.routes.push(route(id));
        for (order, &(stop, weight, crowding)) in stops.iter().enumerate() {
            self.snapshot.segments.push(Segment {
                route: RouteId(id),
                order: order as u32,
                stop: StopId(stop),
                weight,
                crowding: LoadClass::new(crowding).unwrap(),
                geometry: None,
            });
        }
        self
    }

    /// Mark a route as served by low-floor vehicles.
    pub fn low_floor(mut self, id: u32) -> Self {
        self.route_mut(id).low_floor = true;
        self
    }

    /// Take a route out of service.
    pub fn inactive(mut self, id: u32) -> Self {
        self.route_mut(id).active = false;
        self
    }

    /// Attach a polyline to the segment at `order` of `route`.
    pub fn geometry(mut self, route: u32, order: u32, points: &[(f64, f64)]) -> Self {
        let id = GeometryId(self.snapshot.geometries.len() as u32 + 1);
        self.snapshot.geometries.push(Geometry {
            id,
            points: points.iter().map(|&(lat, lon)| Coord::new(lat, lon)).collect(),
        });
        let segment = self
            .snapshot
            .segments
            .iter_mut()
            .find(|s| s.route == RouteId(route) && s.order == order)
            .unwrap();
        segment.geometry = Some(id);
        self
    }

    /// Add an every-day timetable entry.
    pub fn timetable(mut self, route: u32, start: &str, headway_mins: u32) -> Self {
        self.snapshot.timetables.push(TimetableEntry {
            route: RouteId(route),
            start: TimeOfDay::parse(start).unwrap(),
            headway_mins,
            day: None,
        });
        self
    }

    pub fn snapshot(self) -> NetworkSnapshot {
        self.snapshot
    }

    pub fn build(self) -> SnapshotStore {
        SnapshotStore::from_snapshot(self.snapshot).unwrap()
    }

    /// Assemble one route of the network into a line.
    pub fn line(self, id: u32) -> RouteLine {
        let route = self
            .snapshot
            .routes
            .iter()
            .find(|r| r.id == RouteId(id))
            .cloned()
            .unwrap();
        let segments = self
            .snapshot
            .segments
            .into_iter()
            .filter(|s| s.route == RouteId(id))
            .collect();
        RouteLine::new(route, segments).unwrap()
    }

    fn route_mut(&mut self, id: u32) -> &mut Route {
        self.snapshot
            .routes
            .iter_mut()
            .find(|r| r.id == RouteId(id))
            .unwrap()
    }
}

/// An active, not low-floor route record.
pub fn route(id: u32) -> Route {
    Route {
        id: RouteId(id),
        number: id.to_string(),
        label: format!("Route {id}"),
        title: format!("Route {id}"),
        info: None,
        active: true,
        low_floor: false,
    }
}

/// Store wrapper that counts line and timetable fetches.
#[derive(Debug)]
pub struct CountingStore {
    inner: SnapshotStore,
    calls: AtomicUsize,
    last_routes: Mutex<Vec<RouteId>>,
}

impl CountingStore {
    pub fn new(inner: SnapshotStore) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
            last_routes: Mutex::new(Vec::new()),
        }
    }

    /// Number of `route_lines` and `timetable` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Ids passed to the latest `route_lines` call.
    pub fn last_route_request(&self) -> Vec<RouteId> {
        self.last_routes.lock().unwrap().clone()
    }
}

impl NetworkStore for CountingStore {
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
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_routes.lock().unwrap() = routes.to_vec();
        self.inner.route_lines(routes).await
    }

    async fn timetable(
        &self,
        route: RouteId,
        date: NaiveDate,
    ) -> Result<Vec<TimetableEntry>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.timetable(route, date).await
    }

    async fn geometries(&self, ids: &[GeometryId]) -> Result<Vec<Geometry>, StoreError> {
        self.inner.geometries(ids).await
    }
}

/// Store whose every call fails.
#[derive(Debug, Clone, Copy)]
pub enum BrokenStore {
    /// The backing service is down.
    Unavailable,
    /// The backing data violates a network invariant.
    Corrupt,
}

impl BrokenStore {
    fn error(&self) -> StoreError {
        match self {
            BrokenStore::Unavailable => StoreError::Unavailable("database offline".into()),
            BrokenStore::Corrupt => StoreError::Integrity(DomainError::DuplicateOrder {
                route: RouteId(1),
                order: 0,
            }),
        }
    }
}

impl NetworkStore for BrokenStore {
    async fn stops(&self, _ids: &[StopId]) -> Result<Vec<Stop>, StoreError> {
        Err(self.error())
    }

    async fn hub_stops(&self, _hubs: &[HubId]) -> Result<Vec<Stop>, StoreError> {
        Err(self.error())
    }

    async fn routes_serving(&self, _stops: &[StopId]) -> Result<Vec<RouteId>, StoreError> {
        Err(self.error())
    }

    async fn route_lines(&self, _routes: &[RouteId]) -> Result<Vec<Arc<RouteLine>>, StoreError> {
        Err(self.error())
    }

    async fn timetable(
        &self,
        _route: RouteId,
        _date: NaiveDate,
    ) -> Result<Vec<TimetableEntry>, StoreError> {
        Err(self.error())
    }

    async fn geometries(&self, _ids: &[GeometryId]) -> Result<Vec<Geometry>, StoreError> {
        Err(self.error())
    }
}

/// Model answering from a fixed (route, stop) table.
///
/// Pairs missing from the table are reported as unknown routes.
#[derive(Debug, Default)]
pub struct FixedModel {
    counts: HashMap<(RouteId, StopId), f64>,
    calls: AtomicUsize,
}

impl FixedModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, route: u32, stop: u32, passengers: f64) -> Self {
        self.counts.insert((RouteId(route), StopId(stop)), passengers);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LoadModel for FixedModel {
    async fn predict_passengers(&self, query: &PredictionQuery) -> Result<f64, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.counts
            .get(&(query.route_id, query.stop_id))
            .copied()
            .ok_or(ModelError::UnknownRoute(query.route_id))
    }
}

/// Model that always answers with a server error.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingModel;

impl LoadModel for FailingModel {
    async fn predict_passengers(&self, _query: &PredictionQuery) -> Result<f64, ModelError> {
        Err(ModelError::Api {
            status: 500,
            message: "model crashed".into(),
        })
    }
}

/// Model that takes `delay` to answer.
#[derive(Debug, Clone, Copy)]
pub struct SlowModel {
    delay: Duration,
}

impl SlowModel {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl LoadModel for SlowModel {
    async fn predict_passengers(&self, _query: &PredictionQuery) -> Result<f64, ModelError> {
        tokio::time::sleep(self.delay).await;
        Ok(1.0)
    }
}
