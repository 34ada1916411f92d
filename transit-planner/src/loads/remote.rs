//! HTTP client for a remote passenger load model.
//!
//! The model service accepts a JSON [`PredictionQuery`] on
//! `POST {base_url}/predict` and answers `{"passengers": <count>}`.

use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::Semaphore;

use super::model::{LoadModel, ModelError, PredictionQuery};

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 4;

/// Configuration for the remote model client.
#[derive(Debug, Clone)]
pub struct RemoteModelConfig {
    /// Base URL of the model service
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl RemoteModelConfig {
    /// Create a new config for the given service URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_ms: 2_000,
        }
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout_ms(mut self, ms: u64) -> Self {
        self.timeout_ms = ms;
        self
    }

    /// Full URL of the prediction endpoint.
    fn predict_url(&self) -> String {
        format!("{}/predict", self.base_url.trim_end_matches('/'))
    }
}

/// Prediction response body.
#[derive(Debug, Deserialize)]
struct PredictionResponse {
    passengers: f64,
}

/// Remote load model client.
///
/// Uses a semaphore to limit concurrent requests to the model service.
#[derive(Debug, Clone)]
pub struct RemoteLoadModel {
    http: reqwest::Client,
    url: String,
    semaphore: Arc<Semaphore>,
}

impl RemoteLoadModel {
    /// Create a new client with the given configuration.
    pub fn new(config: RemoteModelConfig) -> Result<Self, ModelError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            http,
            url: config.predict_url(),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// Prediction endpoint this client posts to.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl LoadModel for RemoteLoadModel {
    async fn predict_passengers(&self, query: &PredictionQuery) -> Result<f64, ModelError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| ModelError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let response = self.http.post(&self.url).json(query).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ModelError::UnknownRoute(query.route_id));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        parse_prediction(&body)
    }
}

/// Parse and sanity-check a prediction body.
fn parse_prediction(body: &str) -> Result<f64, ModelError> {
    let parsed: PredictionResponse = serde_json::from_str(body).map_err(|e| {
        ModelError::Malformed(format!(
            "{e} (body: {})",
            body.chars().take(200).collect::<String>()
        ))
    })?;

    if !parsed.passengers.is_finite() || parsed.passengers < 0.0 {
        return Err(ModelError::Malformed(format!(
            "passenger count {} is not a non-negative number",
            parsed.passengers
        )));
    }

    Ok(parsed.passengers)
}
