//! Identifier newtypes for network records.
//!
//! Ids are opaque integers handed out by the network store. Wrapping them
//! keeps a stop id from being passed where a route id is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u32> for $name {
            fn from(value: u32) -> Self {
                $name(value)
            }
        }
    };
}

id_type!(
    /// Identifier of a stop.
    StopId
);

id_type!(
    /// Identifier of a transfer hub (a cluster of co-located stops).
    HubId
);

id_type!(
    /// Identifier of a route.
    RouteId
);

id_type!(
    /// Identifier of a geometry polyline.
    GeometryId
);
