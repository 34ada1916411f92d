//! Report assembly.
//!
//! Turns ranked candidates into the serializable report, resolving stop
//! coordinates, transfer stop names and geometry polylines with one batched
//! store call each.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::{Coord, Geometry, GeometryId, LoadClass, RouteId, Stop, StopId};
use crate::network::{NetworkStore, StoreError};

use super::candidate::{DirectCandidate, LegEstimate, TransferCandidate};
use super::graph::Ride;

/// `result` code of a report with at least one itinerary.
pub const RESULT_FOUND: u16 = 200;

/// `result` code of an empty report.
pub const RESULT_EMPTY: u16 = 0;

/// A single-route itinerary as shown to the rider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSimple {
    pub route_id: RouteId,
    pub label: String,
    pub number: String,
    pub info: Option<String>,
    pub load: LoadClass,
    pub time_label: String,
    pub time_begin: String,
    pub time_road: String,
    /// Map path from boarding to alighting stop.
    pub stops: Vec<Coord>,
}

/// One leg of a transfer itinerary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferLeg {
    #[serde(flatten)]
    pub route: RouteSimple,
    /// Where the change happens: the alighting stop for the first leg, the
    /// boarding stop for the second.
    pub stop: String,
}

/// A two-route itinerary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteDouble {
    pub first: TransferLeg,
    pub second: TransferLeg,
}

/// Result of one planning request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteReport {
    /// [`RESULT_FOUND`] or [`RESULT_EMPTY`].
    pub result: u16,
    pub count: usize,
    pub count_simple: usize,
    pub simple_routes: Vec<RouteSimple>,
    pub double_routes: Vec<RouteDouble>,
}

impl RouteReport {
    pub fn new(simple_routes: Vec<RouteSimple>, double_routes: Vec<RouteDouble>) -> Self {
        let count_simple = simple_routes.len();
        let count = count_simple + double_routes.len();
        Self {
            result: if count > 0 { RESULT_FOUND } else { RESULT_EMPTY },
            count,
            count_simple,
            simple_routes,
            double_routes,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Stop and geometry records needed to draw a set of rides.
#[derive(Debug, Default)]
pub struct PathResolver {
    stops: HashMap<StopId, Stop>,
    geometries: HashMap<GeometryId, Geometry>,
}

impl PathResolver {
    /// Fetch every stop and geometry the given rides pass.
    pub async fn load<'r, S, I>(store: &S, rides: I) -> Result<Self, StoreError>
    where
        S: NetworkStore,
        I: IntoIterator<Item = &'r Ride>,
    {
        let mut stop_ids = Vec::new();
        let mut geometry_ids = Vec::new();
        for ride in rides {
            for segment in ride.line.slice_segments(&ride.slice) {
                stop_ids.push(segment.stop);
                if segment.order < ride.slice.end() {
                    geometry_ids.extend(segment.geometry);
                }
            }
        }
        stop_ids.sort();
        stop_ids.dedup();
        geometry_ids.sort();
        geometry_ids.dedup();

        let stops = store.stops(&stop_ids).await?;
        let geometries = store.geometries(&geometry_ids).await?;

        Ok(Self {
            stops: stops.into_iter().map(|s| (s.id, s)).collect(),
            geometries: geometries.into_iter().map(|g| (g.id, g)).collect(),
        })
    }

    /// Coordinates from boarding to alighting stop.
    ///
    /// Each stop is followed by the polyline to the next stop, except the
    /// alighting stop, whose onward polyline is not travelled.
    pub fn path(&self, ride: &Ride) -> Vec<Coord> {
        let mut path = Vec::new();
        for segment in ride.line.slice_segments(&ride.slice) {
            if let Some(stop) = self.stops.get(&segment.stop) {
                path.push(stop.coord);
            }
            if segment.order >= ride.slice.end() {
                continue;
            }
            if let Some(geometry) = segment.geometry.and_then(|id| self.geometries.get(&id)) {
                path.extend_from_slice(&geometry.points);
            }
        }
        path
    }

    /// Display name of a stop.
    pub fn stop_name(&self, id: StopId) -> String {
        self.stops
            .get(&id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    pub fn simple(&self, leg: &LegEstimate) -> RouteSimple {
        let route = leg.ride.line.route();
        RouteSimple {
            route_id: route.id,
            label: route.label.clone(),
            number: route.number.clone(),
            info: route.info.clone(),
            load: leg.load,
            time_label: leg.time_label().to_string(),
            time_begin: leg.time_begin(),
            time_road: leg.time_road(),
            stops: self.path(&leg.ride),
        }
    }

    pub fn double(&self, candidate: &TransferCandidate) -> RouteDouble {
        RouteDouble {
            first: TransferLeg {
                route: self.simple(&candidate.first),
                stop: self.stop_name(candidate.first.ride.alighting_stop()),
            },
            second: TransferLeg {
                route: self.simple(&candidate.second),
                stop: self.stop_name(candidate.second.ride.boarding_stop()),
            },
        }
    }
}

/// Build the report for the surviving candidates, in rank order.
pub async fn assemble_report<S: NetworkStore>(
    store: &S,
    direct: &[DirectCandidate],
    transfers: &[TransferCandidate],
) -> Result<RouteReport, StoreError> {
    let rides = direct
        .iter()
        .map(|c| &c.leg.ride)
        .chain(transfers.iter().flat_map(|c| [&c.first.ride, &c.second.ride]));
    let resolver = PathResolver::load(store, rides).await?;

    Ok(RouteReport::new(
        direct.iter().map(|c| resolver.simple(&c.leg)).collect(),
        transfers.iter().map(|c| resolver.double(c)).collect(),
    ))
}
