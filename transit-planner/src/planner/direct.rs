//! Direct (single-route) itineraries.

use tracing::{debug, trace};

use crate::loads::{LoadMemo, LoadModel};

use super::candidate::{DirectCandidate, LegEstimate, RouteBrief};
use super::context::TripContext;
use super::graph::Ride;
use super::rank::{dedup_first, rank};

/// Evaluate and rank direct rides, keeping the best one per route.
///
/// Also returns the route brief: for each surviving route, how many stops
/// its best ride covers. Transfer itineraries that ride a route further than
/// this are dominated.
pub async fn build_direct<M: LoadModel>(
    rides: Vec<Ride>,
    ctx: &TripContext<'_, M>,
    memo: &mut LoadMemo,
) -> (Vec<DirectCandidate>, RouteBrief) {
    let mut candidates = Vec::with_capacity(rides.len());

    for ride in rides {
        let load = ctx.load(&ride, memo).await;
        let schedule = ctx.schedule(&ride, ctx.departure());
        trace!(
            route = %ride.route(),
            home = ride.slice.home(),
            end = ride.slice.end(),
            %load,
            feasible = schedule.is_some(),
            "direct candidate"
        );
        candidates.push(DirectCandidate::new(
            LegEstimate {
                ride,
                load,
                schedule,
            },
            ctx.config.balance_penalty,
        ));
    }

    let evaluated = candidates.len();
    rank(&mut candidates, ctx.priority);
    let candidates = dedup_first(candidates, DirectCandidate::route);

    let brief: RouteBrief = candidates
        .iter()
        .map(|c| (c.route(), c.leg.slice_len()))
        .collect();

    debug!(
        evaluated,
        kept = candidates.len(),
        "direct itineraries built"
    );
    (candidates, brief)
}
