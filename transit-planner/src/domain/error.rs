//! Domain error types.
//!
//! These errors represent inconsistencies in network data. They point at a
//! defect upstream of the planner and are kept distinct from "no result".

use super::{RouteId, StopId};

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// Two segments of one route share an order index
    #[error("route {route} has more than one segment with order {order}")]
    DuplicateOrder { route: RouteId, order: u32 },

    /// A segment was handed to a route it does not belong to
    #[error("segment {order} belongs to route {found}, not route {route}")]
    ForeignSegment {
        route: RouteId,
        found: RouteId,
        order: u32,
    },

    /// Segment weight is negative or not a number
    #[error("route {route} segment {order} has invalid weight {weight}")]
    InvalidWeight {
        route: RouteId,
        order: u32,
        weight: f64,
    },

    /// Segment references a stop the network does not contain
    #[error("route {route} segment {order} references unknown stop {stop}")]
    UnknownStop {
        route: RouteId,
        order: u32,
        stop: StopId,
    },

    /// Segment or timetable references a route the network does not contain
    #[error("reference to unknown route {0}")]
    UnknownRoute(RouteId),

    /// Slice does not travel forward along the route
    #[error("invalid slice [{home}, {end}]: end must be after home")]
    InvalidSlice { home: u32, end: u32 },
}
