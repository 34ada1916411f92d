//! Passenger load classes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a load level is outside 0-5.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid load class {0}: must be 0-5")]
pub struct InvalidLoadClass(pub u8);

/// Expected vehicle crowding on a 0 (empty) to 5 (packed) scale.
///
/// # Examples
///
/// ```
/// use transit_planner::domain::LoadClass;
///
/// assert_eq!(LoadClass::from_passengers(2.5).value(), 0);
/// assert_eq!(LoadClass::from_passengers(7.0).value(), 2);
/// assert_eq!(LoadClass::from_passengers(40.0).value(), 5);
///
/// assert!(LoadClass::new(6).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct LoadClass(u8);

impl LoadClass {
    /// Highest load level.
    pub const MAX: LoadClass = LoadClass(5);

    /// Lowest load level.
    pub const EMPTY: LoadClass = LoadClass(0);

    /// Validate a raw load level.
    pub fn new(level: u8) -> Result<Self, InvalidLoadClass> {
        if level > Self::MAX.0 {
            return Err(InvalidLoadClass(level));
        }
        Ok(Self(level))
    }

    /// Classify an expected passenger count.
    ///
    /// Breakpoints: up to 3 is 0, up to 6 is 1, up to 9 is 2, up to 12 is 3,
    /// up to 15 is 4, anything above is 5.
    pub fn from_passengers(count: f64) -> Self {
        let level = if count <= 3.0 {
            0
        } else if count <= 6.0 {
            1
        } else if count <= 9.0 {
            2
        } else if count <= 12.0 {
            3
        } else if count <= 15.0 {
            4
        } else {
            5
        };
        Self(level)
    }

    /// The raw 0-5 level.
    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for LoadClass {
    type Error = InvalidLoadClass;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        LoadClass::new(value)
    }
}

impl From<LoadClass> for u8 {
    fn from(value: LoadClass) -> Self {
        value.0
    }
}

impl fmt::Display for LoadClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
