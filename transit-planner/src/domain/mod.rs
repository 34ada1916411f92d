//! Domain types for the transit planner.
//!
//! This module contains the core domain model types that represent
//! validated network data. Types enforce their invariants at construction
//! time, so code that receives them can trust their validity.

mod error;
mod ids;
mod line;
mod load;
mod network;
mod time;

pub use error::DomainError;
pub use ids::{GeometryId, HubId, RouteId, StopId};
pub use line::{RouteLine, Slice, SliceWeights};
pub use load::{InvalidLoadClass, LoadClass};
pub use network::{Coord, Geometry, Hub, Route, Segment, Stop, TimetableEntry};
pub use time::{
    MINUTES_PER_DAY, TimeError, TimeOfDay, format_clock, format_clock_seconds, weekday_name,
};
