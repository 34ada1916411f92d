//! Transit trip planner.
//!
//! Plans direct and one-change bus trips between two stops, ranking them by
//! expected crowding, travel time, or a blend of both. Crowding comes from a
//! remote predictive model when one is configured, with static per-segment
//! data as the fallback.

pub mod cache;
pub mod domain;
pub mod loads;
pub mod network;
pub mod planner;

#[cfg(test)]
mod testing;
