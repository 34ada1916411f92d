//! Trip planner.
//!
//! Answers "how do I get from this stop to that one, and how crowded will
//! it be?" for one request at a time:
//!
//! 1. both ends are expanded through their transfer hubs,
//! 2. the routes around them are loaded into a [`graph::NetworkView`],
//! 3. direct rides and one-change chains are evaluated for load and
//!    timetable departure,
//! 4. the survivors are ranked by the requested [`Priority`] and assembled
//!    into a [`RouteReport`].

mod candidate;
mod config;
mod context;
mod direct;
mod expand;
mod graph;
mod plan;
mod rank;
mod report;
mod timing;
mod transfer;

pub use config::PlannerConfig;
pub use expand::{Endpoints, expand_endpoints, expand_stop};
pub use plan::{PlanError, PlanRequest, Planner};
pub use rank::{InvalidPriority, NO_DEPARTURE_MINUTES, Priority};
pub use report::{RESULT_EMPTY, RESULT_FOUND, RouteDouble, RouteReport, RouteSimple, TransferLeg};
pub use timing::{Schedule, estimate_schedule};
