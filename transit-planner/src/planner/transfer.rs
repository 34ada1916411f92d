//! One-transfer itineraries.

use tracing::{debug, trace};

use crate::loads::{LoadMemo, LoadModel};

use super::candidate::{LegEstimate, RouteBrief, TransferCandidate};
use super::context::TripContext;
use super::graph::TransferChain;
use super::rank::{dedup_first, rank};

/// Keep one chain per route pair, preferring the shortest rides.
///
/// Chains are compared by first-leg length, then second-leg length; ties
/// keep enumeration order.
pub fn shortest_per_route_pair(mut chains: Vec<TransferChain>) -> Vec<TransferChain> {
    chains.sort_by_key(|c| (c.first.slice.len(), c.second.slice.len()));
    dedup_first(chains, TransferChain::routes)
}

/// Evaluate, filter and rank transfer chains.
///
/// The second leg is only scheduled when the first has a departure; it
/// leaves no earlier than the first leg's arrival plus the transfer buffer.
/// Chains riding a route further than its best direct ride (per `brief`)
/// are dropped. At most `max_transfer_results` candidates are returned.
pub async fn build_transfers<M: LoadModel>(
    chains: Vec<TransferChain>,
    brief: &RouteBrief,
    ctx: &TripContext<'_, M>,
    memo: &mut LoadMemo,
) -> Vec<TransferCandidate> {
    let chains = shortest_per_route_pair(chains);
    let buffer = f64::from(ctx.config.transfer_buffer_mins);

    let mut candidates = Vec::with_capacity(chains.len());
    for chain in chains {
        let first_load = ctx.load(&chain.first, memo).await;
        let second_load = ctx.load(&chain.second, memo).await;

        let first_schedule = ctx.schedule(&chain.first, ctx.departure());
        let second_schedule = first_schedule.and_then(|first| {
            let ready = first.arrival() + buffer;
            ctx.schedule(&chain.second, ready)
        });

        trace!(
            first = %chain.first.route(),
            second = %chain.second.route(),
            change_at = %chain.first.alighting_stop(),
            first_feasible = first_schedule.is_some(),
            second_feasible = second_schedule.is_some(),
            "transfer candidate"
        );

        candidates.push(TransferCandidate::new(
            LegEstimate {
                ride: chain.first,
                load: first_load,
                schedule: first_schedule,
            },
            LegEstimate {
                ride: chain.second,
                load: second_load,
                schedule: second_schedule,
            },
            buffer,
            ctx.config.balance_penalty,
        ));
    }

    let evaluated = candidates.len();
    candidates.retain(|c| !c.exceeds_brief(brief));
    let undominated = candidates.len();

    rank(&mut candidates, ctx.priority);
    candidates.truncate(ctx.config.max_transfer_results);

    debug!(
        evaluated,
        undominated,
        kept = candidates.len(),
        "transfer itineraries built"
    );
    candidates
}
