//! Candidate ranking.
//!
//! Candidates are ordered by an integer key whose layout depends on the
//! requested [`Priority`]. Sorting is stable, so candidates with equal keys
//! keep the order in which they were enumerated.

use std::collections::HashSet;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::domain::LoadClass;

/// Trip time given to candidates without a remaining departure.
///
/// Large enough to rank them after every feasible trip.
pub const NO_DEPARTURE_MINUTES: i64 = 99_999;

/// What the rider cares about most.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Priority {
    /// Least crowded first.
    #[default]
    Load,
    /// Fastest first.
    Time,
    /// Ride time inflated by crowding.
    Balance,
}

/// A priority code outside 0-2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("priority must be 0 (load), 1 (time) or 2 (balance), got {0}")]
pub struct InvalidPriority(pub u8);

impl TryFrom<u8> for Priority {
    type Error = InvalidPriority;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Priority::Load),
            1 => Ok(Priority::Time),
            2 => Ok(Priority::Balance),
            other => Err(InvalidPriority(other)),
        }
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> u8 {
        match priority {
            Priority::Load => 0,
            Priority::Time => 1,
            Priority::Balance => 2,
        }
    }
}

/// Sort key; compared lexicographically, smaller ranks first.
pub type RankKey = [i64; 6];

/// Something that can be ranked under a priority.
pub trait Ranked {
    fn rank_key(&self, priority: Priority) -> RankKey;
}

/// Ride time penalised by crowding: `total - ride + (1 + penalty * load) * ride`.
pub fn weighted_minutes(total: f64, ride: f64, load: LoadClass, penalty: f64) -> f64 {
    total - ride + (1.0 + penalty * f64::from(load.value())) * ride
}

/// Whole minutes for ranking, truncating fractions.
pub fn whole_minutes(minutes: f64) -> i64 {
    minutes.floor() as i64
}

/// Sort candidates best-first under `priority`. Stable.
pub fn rank<T: Ranked>(candidates: &mut [T], priority: Priority) {
    candidates.sort_by_cached_key(|c| c.rank_key(priority));
}

/// Keep only the first candidate for each key.
pub fn dedup_first<T, K, F>(candidates: Vec<T>, key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|c| seen.insert(key(c)))
        .collect()
}
