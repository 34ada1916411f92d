//! Passenger load estimation.
//!
//! A predictive model guesses how many passengers board at a stop. The
//! model is optional and fallible, so [`LoadEstimator`] wraps it: it bounds
//! the call with a timeout, turns counts into a [`LoadClass`], and falls
//! back to the static crowding recorded on route segments whenever the model
//! cannot answer.
//!
//! [`LoadClass`]: crate::domain::LoadClass

mod estimator;
mod model;
mod remote;

pub use estimator::{LoadEstimator, LoadMemo, LoadQuery};
pub use model::{DisabledModel, LoadModel, ModelError, PredictionQuery};
pub use remote::{RemoteLoadModel, RemoteModelConfig};
