//! Origin and destination expansion through transfer hubs.

use tracing::trace;

use crate::domain::StopId;
use crate::network::NetworkStore;

use super::plan::PlanError;

/// The stops a trip may start from and end at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub from: Vec<StopId>,
    pub to: Vec<StopId>,
}

impl Endpoints {
    pub fn is_origin(&self, stop: StopId) -> bool {
        self.from.contains(&stop)
    }

    pub fn is_destination(&self, stop: StopId) -> bool {
        self.to.contains(&stop)
    }
}

/// Expand a stop to every stop of its hub, or to itself when it has none.
///
/// The result always contains `id`. Unknown stops are rejected.
pub async fn expand_stop<S: NetworkStore>(store: &S, id: StopId) -> Result<Vec<StopId>, PlanError> {
    let stop = store
        .stops(&[id])
        .await?
        .into_iter()
        .next()
        .ok_or(PlanError::UnknownStop(id))?;

    let Some(hub) = stop.hub else {
        return Ok(vec![id]);
    };

    let mut members: Vec<StopId> = store
        .hub_stops(&[hub])
        .await?
        .into_iter()
        .map(|s| s.id)
        .collect();
    if !members.contains(&id) {
        members.push(id);
    }
    members.sort();

    trace!(stop = %id, hub = %hub, members = members.len(), "expanded stop through hub");
    Ok(members)
}

/// Expand both ends of a trip.
pub async fn expand_endpoints<S: NetworkStore>(
    store: &S,
    from: StopId,
    to: StopId,
) -> Result<Endpoints, PlanError> {
    Ok(Endpoints {
        from: expand_stop(store, from).await?,
        to: expand_stop(store, to).await?,
    })
}
