//! The slice of the network one request plans over.
//!
//! Everything the builders need is fetched up front in a handful of batched
//! store calls: the lines serving either end of the trip, the hub members of
//! every stop a first leg could alight at, and the day's timetables.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use chrono::NaiveDate;
use futures::future::join_all;
use tracing::{debug, trace};

use crate::domain::{
    DomainError, HubId, RouteId, RouteLine, Segment, Slice, StopId, TimetableEntry,
};
use crate::network::{NetworkStore, StoreError};

use super::expand::Endpoints;

/// Riding one route from `slice.home()` to `slice.end()`.
#[derive(Debug, Clone)]
pub struct Ride {
    pub line: Arc<RouteLine>,
    pub slice: Slice,
    board: StopId,
    alight: StopId,
}

impl Ride {
    pub fn new(
        line: &Arc<RouteLine>,
        board: &Segment,
        alight: &Segment,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            line: Arc::clone(line),
            slice: Slice::new(line.id(), board.order, alight.order)?,
            board: board.stop,
            alight: alight.stop,
        })
    }

    pub fn route(&self) -> RouteId {
        self.slice.route()
    }

    pub fn boarding_stop(&self) -> StopId {
        self.board
    }

    pub fn alighting_stop(&self) -> StopId {
        self.alight
    }
}

/// Two rides joined by a change of vehicle.
#[derive(Debug, Clone)]
pub struct TransferChain {
    pub first: Ride,
    pub second: Ride,
}

impl TransferChain {
    /// Route pair identifying the chain.
    pub fn routes(&self) -> (RouteId, RouteId) {
        (self.first.route(), self.second.route())
    }
}

/// Request options that shape which data is loaded.
#[derive(Debug, Clone, Copy)]
pub struct ViewOptions {
    pub accessible_only: bool,
    pub with_transfers: bool,
    pub date: NaiveDate,
}

/// Plannable lines, interchanges and timetables around one trip.
#[derive(Debug, Default)]
pub struct NetworkView {
    /// Plannable lines serving an origin stop, ascending by route.
    origin_lines: Vec<Arc<RouteLine>>,
    /// Plannable lines serving a destination stop, ascending by route.
    destination_lines: Vec<Arc<RouteLine>>,
    /// Hub stop -> stops of its hub (itself included). Stops outside a hub
    /// are not interchanges.
    interchanges: HashMap<StopId, Vec<StopId>>,
    timetables: HashMap<RouteId, Vec<TimetableEntry>>,
}

impl NetworkView {
    /// Fetch everything needed to plan between `ends`.
    pub async fn load<S: NetworkStore>(
        store: &S,
        ends: &Endpoints,
        options: ViewOptions,
    ) -> Result<Self, StoreError> {
        let origin_ids = store.routes_serving(&ends.from).await?;
        let destination_ids = if options.with_transfers {
            store.routes_serving(&ends.to).await?
        } else {
            Vec::new()
        };

        let wanted: Vec<RouteId> = origin_ids
            .iter()
            .chain(&destination_ids)
            .copied()
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let lines: BTreeMap<RouteId, Arc<RouteLine>> = store
            .route_lines(&wanted)
            .await?
            .into_iter()
            .filter(|line| line.route().is_plannable(options.accessible_only))
            .map(|line| (line.id(), line))
            .collect();

        let pick = |ids: &[RouteId]| -> Vec<Arc<RouteLine>> {
            lines
                .iter()
                .filter(|(id, _)| ids.contains(id))
                .map(|(_, line)| Arc::clone(line))
                .collect()
        };
        let origin_lines = pick(&origin_ids);
        let destination_lines = pick(&destination_ids);

        let interchanges = if options.with_transfers {
            Self::load_interchanges(store, &origin_lines).await?
        } else {
            HashMap::new()
        };

        let lookups = lines
            .keys()
            .map(|&id| async move { (id, store.timetable(id, options.date).await) });
        let mut timetables = HashMap::with_capacity(lines.len());
        for (id, entries) in join_all(lookups).await {
            timetables.insert(id, entries?);
        }

        debug!(
            origin_routes = origin_lines.len(),
            destination_routes = destination_lines.len(),
            interchanges = interchanges.len(),
            skipped = wanted.len().saturating_sub(lines.len()),
            "network view loaded"
        );

        Ok(Self {
            origin_lines,
            destination_lines,
            interchanges,
            timetables,
        })
    }

    /// Map every hub stop on the origin lines to the stops of its hub.
    async fn load_interchanges<S: NetworkStore>(
        store: &S,
        origin_lines: &[Arc<RouteLine>],
    ) -> Result<HashMap<StopId, Vec<StopId>>, StoreError> {
        let mut candidates: Vec<StopId> = origin_lines
            .iter()
            .flat_map(|line| line.segments().iter().map(|s| s.stop))
            .collect();
        candidates.sort();
        candidates.dedup();

        let stops = store.stops(&candidates).await?;
        let mut hubs: Vec<HubId> = stops.iter().filter_map(|s| s.hub).collect();
        hubs.sort();
        hubs.dedup();

        let mut members: HashMap<HubId, Vec<StopId>> = HashMap::new();
        for stop in store.hub_stops(&hubs).await? {
            if let Some(hub) = stop.hub {
                members.entry(hub).or_default().push(stop.id);
            }
        }

        Ok(stops
            .into_iter()
            .filter_map(|stop| {
                let hub = stop.hub?;
                let mut reachable = members.get(&hub).cloned().unwrap_or_default();
                if !reachable.contains(&stop.id) {
                    reachable.push(stop.id);
                }
                Some((stop.id, reachable))
            })
            .collect())
    }

    /// Timetable of `route` on the planning date.
    pub fn timetable(&self, route: RouteId) -> &[TimetableEntry] {
        self.timetables
            .get(&route)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Every single-route ride from an origin stop to a later destination stop.
    ///
    /// Ordered by route, then boarding order, then alighting order.
    pub fn direct_rides(&self, ends: &Endpoints) -> Result<Vec<Ride>, DomainError> {
        let mut rides = Vec::new();
        for line in &self.origin_lines {
            for board in line.segments().iter().filter(|s| ends.is_origin(s.stop)) {
                for alight in line
                    .segments()
                    .iter()
                    .filter(|s| s.order > board.order && ends.is_destination(s.stop))
                {
                    rides.push(Ride::new(line, board, alight)?);
                }
            }
        }
        trace!(rides = rides.len(), "enumerated direct rides");
        Ok(rides)
    }

    /// Every two-route chain changing at a shared hub.
    ///
    /// The first route boards at an origin stop and alights at some stop X;
    /// the second, a different route, boards at a stop sharing X's hub and
    /// alights at a destination stop. Stops outside a hub are never
    /// changed at.
    pub fn transfer_chains(&self, ends: &Endpoints) -> Result<Vec<TransferChain>, DomainError> {
        // Stop -> (destination line, segment) for every second-leg boarding
        let mut boardings: HashMap<StopId, Vec<(&Arc<RouteLine>, &Segment)>> = HashMap::new();
        for line in &self.destination_lines {
            let last_exit = line
                .segments()
                .iter()
                .filter(|s| ends.is_destination(s.stop))
                .map(|s| s.order)
                .max();
            let Some(last_exit) = last_exit else {
                continue;
            };
            for segment in line.segments().iter().filter(|s| s.order < last_exit) {
                boardings
                    .entry(segment.stop)
                    .or_default()
                    .push((line, segment));
            }
        }

        let mut chains = Vec::new();
        for first_line in &self.origin_lines {
            for board in first_line
                .segments()
                .iter()
                .filter(|s| ends.is_origin(s.stop))
            {
                for alight in first_line.segments().iter().filter(|s| s.order > board.order) {
                    let Some(changes) = self.interchanges.get(&alight.stop) else {
                        continue;
                    };
                    for change in changes {
                        let Some(onward) = boardings.get(change) else {
                            continue;
                        };
                        for &(second_line, second_board) in onward {
                            if second_line.id() == first_line.id() {
                                continue;
                            }
                            for exit in second_line
                                .segments()
                                .iter()
                                .filter(|s| {
                                    s.order > second_board.order && ends.is_destination(s.stop)
                                })
                            {
                                chains.push(TransferChain {
                                    first: Ride::new(first_line, board, alight)?,
                                    second: Ride::new(second_line, second_board, exit)?,
                                });
                            }
                        }
                    }
                }
            }
        }

        trace!(chains = chains.len(), "enumerated transfer chains");
        Ok(chains)
    }
}
