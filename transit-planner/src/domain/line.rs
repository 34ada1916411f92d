//! Validated routes with their ordered segments.
//!
//! A `RouteLine` is the unit the planner reasons about: the route record
//! plus its segments sorted by order. Weight and crowding queries over a
//! slice of the line are answered here so builders never touch raw rows.

use super::{DomainError, LoadClass, Route, RouteId, Segment};

/// A `[home, end]` stretch of one route, boarding at `home` and alighting at `end`.
///
/// # Invariants
///
/// - `end > home` (must travel forward along the route)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slice {
    route: RouteId,
    home: u32,
    end: u32,
}

impl Slice {
    /// Construct a slice, rejecting ones that do not travel forward.
    pub fn new(route: RouteId, home: u32, end: u32) -> Result<Self, DomainError> {
        if end <= home {
            return Err(DomainError::InvalidSlice { home, end });
        }
        Ok(Self { route, home, end })
    }

    pub fn route(&self) -> RouteId {
        self.route
    }

    /// Boarding order.
    pub fn home(&self) -> u32 {
        self.home
    }

    /// Alighting order.
    pub fn end(&self) -> u32 {
        self.end
    }

    /// Number of order steps travelled.
    pub fn len(&self) -> u32 {
        self.end - self.home
    }
}

/// Duration weights of a slice relative to its whole route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceWeights {
    /// Weight travelled before the boarding stop.
    pub before: f64,
    /// Weight of the ride itself.
    pub leg: f64,
    /// Weight of one full lap of the route.
    pub total: f64,
}

/// A route with its segments, sorted and validated.
///
/// # Invariants
///
/// - Segment orders are unique and strictly increasing
/// - Every segment belongs to this route
/// - Every weight is finite and non-negative
#[derive(Debug, Clone)]
pub struct RouteLine {
    route: Route,
    segments: Vec<Segment>,
}

impl RouteLine {
    /// Assemble a line from a route and its segments in any order.
    pub fn new(route: Route, mut segments: Vec<Segment>) -> Result<Self, DomainError> {
        segments.sort_by_key(|s| s.order);

        for segment in &segments {
            if segment.route != route.id {
                return Err(DomainError::ForeignSegment {
                    route: route.id,
                    found: segment.route,
                    order: segment.order,
                });
            }
            if !segment.weight.is_finite() || segment.weight < 0.0 {
                return Err(DomainError::InvalidWeight {
                    route: route.id,
                    order: segment.order,
                    weight: segment.weight,
                });
            }
        }

        if let Some(pair) = segments.windows(2).find(|w| w[0].order == w[1].order) {
            return Err(DomainError::DuplicateOrder {
                route: route.id,
                order: pair[0].order,
            });
        }

        Ok(Self { route, segments })
    }

    pub fn id(&self) -> RouteId {
        self.route.id
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Segments in order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The segment with the given order, if present.
    pub fn segment(&self, order: u32) -> Option<&Segment> {
        self.segments
            .binary_search_by_key(&order, |s| s.order)
            .ok()
            .map(|idx| &self.segments[idx])
    }

    /// The last segment strictly before `order`.
    pub fn previous(&self, order: u32) -> Option<&Segment> {
        let idx = self.segments.partition_point(|s| s.order < order);
        idx.checked_sub(1).map(|i| &self.segments[i])
    }

    /// Segments with order in `[home, end]`, both ends included.
    pub fn slice_segments(&self, slice: &Slice) -> &[Segment] {
        let start = self.segments.partition_point(|s| s.order < slice.home());
        let stop = self.segments.partition_point(|s| s.order <= slice.end());
        &self.segments[start..stop]
    }

    /// Sum of weights of segments with order in `[home, end)`.
    pub fn weight_between(&self, home: u32, end: u32) -> f64 {
        self.segments
            .iter()
            .filter(|s| s.order >= home && s.order < end)
            .map(|s| s.weight)
            .sum()
    }

    /// Sum of weights of segments strictly before `home`.
    pub fn weight_before(&self, home: u32) -> f64 {
        self.segments
            .iter()
            .take_while(|s| s.order < home)
            .map(|s| s.weight)
            .sum()
    }

    /// Weight of a full lap: every segment except the last.
    ///
    /// The last segment is the terminus and has no onward step.
    pub fn total_weight(&self) -> f64 {
        match self.segments.split_last() {
            Some((_, rest)) => rest.iter().map(|s| s.weight).sum(),
            None => 0.0,
        }
    }

    /// Weights needed to place `slice` on a timetable lap.
    pub fn slice_weights(&self, slice: &Slice) -> SliceWeights {
        SliceWeights {
            before: self.weight_before(slice.home()),
            leg: self.weight_between(slice.home(), slice.end()),
            total: self.total_weight(),
        }
    }

    /// Highest static crowding over segments in `[home, end)`.
    pub fn max_crowding(&self, home: u32, end: u32) -> LoadClass {
        self.segments
            .iter()
            .filter(|s| s.order >= home && s.order < end)
            .map(|s| s.crowding)
            .max()
            .unwrap_or(LoadClass::EMPTY)
    }
}
