//! Load estimation with model fallback.

use std::collections::HashMap;
use std::time::Duration;

use chrono::Weekday;
use tracing::{debug, trace, warn};

use crate::domain::{LoadClass, RouteId, RouteLine, StopId, format_clock_seconds, weekday_name};

use super::model::{LoadModel, ModelError, PredictionQuery};

/// Per-request memo of estimated loads, keyed by (route, boarding stop).
pub type LoadMemo = HashMap<(RouteId, StopId), LoadClass>;

/// What to estimate: boarding a route at one stop at one time.
#[derive(Debug, Clone, Copy)]
pub struct LoadQuery<'a> {
    pub line: &'a RouteLine,
    pub boarding_order: u32,
    pub alighting_order: u32,
    /// Stop at `boarding_order`.
    pub stop: StopId,
    /// Requested departure, minutes since midnight.
    pub departure_mins: i64,
    pub weekday: Weekday,
}

/// Turns model predictions into load classes.
///
/// Every model call is bounded by `timeout`. When the model fails in any way
/// the estimate falls back to the highest static crowding over the ridden
/// segments, so estimation itself never fails.
#[derive(Debug, Clone)]
pub struct LoadEstimator<M> {
    model: M,
    timeout: Duration,
}

impl<M: LoadModel> LoadEstimator<M> {
    pub fn new(model: M, timeout: Duration) -> Self {
        Self { model, timeout }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Estimate the load class for `query`, consulting and filling `memo`.
    pub async fn estimate(&self, query: &LoadQuery<'_>, memo: &mut LoadMemo) -> LoadClass {
        let key = (query.line.id(), query.stop);
        if let Some(&load) = memo.get(&key) {
            trace!(route = %key.0, stop = %key.1, %load, "load memo hit");
            return load;
        }

        let load = match self.predicted_passengers(query).await {
            Ok(count) => {
                let load = LoadClass::from_passengers(count);
                trace!(route = %key.0, stop = %key.1, count, %load, "predicted load");
                load
            }
            Err(ModelError::Disabled) => {
                query.line.max_crowding(query.boarding_order, query.alighting_order)
            }
            Err(e) => {
                let load = query
                    .line
                    .max_crowding(query.boarding_order, query.alighting_order);
                warn!(
                    route = %key.0,
                    stop = %key.1,
                    error = %e,
                    fallback = %load,
                    "load model failed, using static crowding"
                );
                load
            }
        };

        memo.insert(key, load);
        load
    }

    /// Expected passengers at the boarding stop plus those already aboard
    /// from the stop before it.
    async fn predicted_passengers(&self, query: &LoadQuery<'_>) -> Result<f64, ModelError> {
        let time = format_clock_seconds(query.departure_mins);
        let day = weekday_name(query.weekday);

        let boarding = PredictionQuery {
            route_id: query.line.id(),
            order: query.boarding_order,
            stop_id: query.stop,
            time,
            day_of_week: day.to_string(),
        };
        let mut count = self.predict(&boarding).await?;

        let previous = match query.boarding_order {
            0 => None,
            order => query.line.previous(order),
        };
        if let Some(previous) = previous {
            let upstream = PredictionQuery {
                order: previous.order,
                stop_id: previous.stop,
                ..boarding
            };
            match self.predict(&upstream).await {
                Ok(extra) => count += extra,
                Err(e) => debug!(
                    route = %query.line.id(),
                    order = previous.order,
                    error = %e,
                    "no upstream prediction"
                ),
            }
        }

        Ok(count)
    }

    async fn predict(&self, query: &PredictionQuery) -> Result<f64, ModelError> {
        let count = tokio::time::timeout(self.timeout, self.model.predict_passengers(query))
            .await
            .map_err(|_| ModelError::Timeout(self.timeout))??;

        if !count.is_finite() || count < 0.0 {
            return Err(ModelError::Malformed(format!(
                "passenger count {count} is not a non-negative number"
            )));
        }
        Ok(count)
    }
}
