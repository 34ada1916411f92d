//! Transit network records as served by the network store.
//!
//! These are plain data records. Ordering and weight invariants across a
//! route's segments are checked when the segments are assembled into a
//! [`RouteLine`](super::RouteLine).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{GeometryId, HubId, LoadClass, RouteId, StopId, TimeOfDay};

/// A WGS84 coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

impl Coord {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// A physical stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub id: StopId,
    pub name: String,
    pub coord: Coord,
    /// Transfer hub this stop belongs to, if any.
    #[serde(default)]
    pub hub: Option<HubId>,
}

/// A cluster of co-located stops a rider can walk between at no cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hub {
    pub id: HubId,
    pub name: String,
}

/// A transit route (one line in one direction).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub id: RouteId,
    /// Public line number, e.g. "12A".
    pub number: String,
    pub label: String,
    pub title: String,
    /// Free-text rider information.
    #[serde(default)]
    pub info: Option<String>,
    /// Only active routes are planned over.
    #[serde(default = "default_active")]
    pub active: bool,
    /// Served by low-floor (step-free) vehicles.
    #[serde(default)]
    pub low_floor: bool,
}

fn default_active() -> bool {
    true
}

impl Route {
    /// Whether this route may appear in a plan with the given accessibility filter.
    pub fn is_plannable(&self, accessible_only: bool) -> bool {
        self.active && (!accessible_only || self.low_floor)
    }
}

/// One stop-to-stop step of a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub route: RouteId,
    /// Position along the route, 0-based and strictly increasing.
    pub order: u32,
    pub stop: StopId,
    /// Relative travel-time weight from this stop to the next.
    pub weight: f64,
    /// Static crowding recorded for this step.
    #[serde(default)]
    pub crowding: LoadClass,
    /// Polyline drawn between this stop and the next.
    #[serde(default)]
    pub geometry: Option<GeometryId>,
}

/// Intermediate map points between two consecutive stops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub id: GeometryId,
    pub points: Vec<Coord>,
}

/// A recurring departure pattern for a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableEntry {
    pub route: RouteId,
    /// Time the service leaves the first stop.
    pub start: TimeOfDay,
    /// Minutes the vehicle needs for one full lap of the route.
    pub headway_mins: u32,
    /// Restricts the entry to one calendar date.
    #[serde(default)]
    pub day: Option<NaiveDate>,
}

impl TimetableEntry {
    /// Whether the entry runs on `date`. Unscoped entries run every day.
    pub fn applies_on(&self, date: NaiveDate) -> bool {
        self.day.is_none_or(|day| day == date)
    }
}
