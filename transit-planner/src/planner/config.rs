//! Planner configuration.

use std::time::Duration;

/// Tuning parameters for trip planning.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Minutes allowed between alighting leg 1 and boarding leg 2.
    pub transfer_buffer_mins: u32,

    /// Extra weight per load class applied to ride time under the
    /// balance priority.
    pub balance_penalty: f64,

    /// Maximum number of transfer itineraries to return.
    pub max_transfer_results: usize,

    /// How long a single load model call may take (milliseconds).
    /// Slower calls fall back to static crowding.
    pub model_timeout_ms: u64,
}

impl PlannerConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(
        transfer_buffer_mins: u32,
        balance_penalty: f64,
        max_transfer_results: usize,
        model_timeout_ms: u64,
    ) -> Self {
        Self {
            transfer_buffer_mins,
            balance_penalty,
            max_transfer_results,
            model_timeout_ms,
        }
    }

    /// Returns the model timeout as a Duration.
    pub fn model_timeout(&self) -> Duration {
        Duration::from_millis(self.model_timeout_ms)
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            transfer_buffer_mins: 5,
            balance_penalty: 0.2,
            max_transfer_results: 4,
            model_timeout_ms: 800,
        }
    }
}
