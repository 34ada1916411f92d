//! Load model capability and its error type.

use std::time::Duration;

use serde::Serialize;

use crate::domain::{RouteId, StopId};

/// Errors from a passenger load model.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// HTTP request failed (network error, connect timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Model service answered with an error status
    #[error("model error {status}: {message}")]
    Api { status: u16, message: String },

    /// Model answered with something that is not a passenger count
    #[error("malformed prediction: {0}")]
    Malformed(String),

    /// Model was never trained on this route
    #[error("route {0} is unknown to the model")]
    UnknownRoute(RouteId),

    /// Model did not answer in time
    #[error("model did not answer within {0:?}")]
    Timeout(Duration),

    /// No model is configured
    #[error("no load model configured")]
    Disabled,
}

/// Input to one passenger prediction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictionQuery {
    pub route_id: RouteId,
    /// Order of the stop along the route.
    pub order: u32,
    pub stop_id: StopId,
    /// Time of day as "HH:MM:SS".
    pub time: String,
    /// Full weekday name, e.g. "Friday".
    pub day_of_week: String,
}

/// Trait for predicting passenger counts.
///
/// This abstraction allows the estimator to run against a remote model in
/// production and a deterministic fake in tests.
#[allow(async_fn_in_trait)]
pub trait LoadModel {
    /// Predict the number of passengers boarding at the queried stop.
    async fn predict_passengers(&self, query: &PredictionQuery) -> Result<f64, ModelError>;
}

/// Load model used when no predictive model is deployed.
///
/// Always declines, so every estimate comes from static crowding.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledModel;

impl LoadModel for DisabledModel {
    async fn predict_passengers(&self, _query: &PredictionQuery) -> Result<f64, ModelError> {
        Err(ModelError::Disabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ModelError::UnknownRoute(RouteId(12));
        assert_eq!(err.to_string(), "route 12 is unknown to the model");

        let err = ModelError::Api {
            status: 503,
            message: "warming up".into(),
        };
        assert_eq!(err.to_string(), "model error 503: warming up");

        let err = ModelError::Timeout(Duration::from_millis(250));
        assert_eq!(err.to_string(), "model did not answer within 250ms");
    }

    #[test]
    fn query_serializes_flat() {
        let query = PredictionQuery {
            route_id: RouteId(163),
            order: 3,
            stop_id: StopId(281),
            time: "07:30:00".into(),
            day_of_week: "Friday".into(),
        };
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json["route_id"], 163);
        assert_eq!(json["stop_id"], 281);
        assert_eq!(json["time"], "07:30:00");
    }

    #[tokio::test]
    async fn disabled_model_declines() {
        let query = PredictionQuery {
            route_id: RouteId(1),
            order: 0,
            stop_id: StopId(1),
            time: "08:00:00".into(),
            day_of_week: "Monday".into(),
        };
        let result = DisabledModel.predict_passengers(&query).await;
        assert!(matches!(result, Err(ModelError::Disabled)));
    }
}
