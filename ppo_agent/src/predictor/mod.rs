//! Policy/value predictor interface.
//!
//! A predictor maps a batch of states to three index-aligned batches:
//! actions, log probabilities and state values. The interaction loop always
//! passes a batch of one and reads index 0 of each output.
//!
//! - [`Predictor`]: the trait consumed by the interaction loop
//! - [`ModelPredictor`]: burn-backed predictor over a [`PolicyValueNet`]

pub mod model;

pub use model::{ModelPredictor, PolicyValueNet};

use crate::core::{Action, AgentError, Observation, Result};

/// Output of a predictor call, aligned with the input batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// One action per state
    pub actions: Vec<Action>,
    /// Log probability of each action
    pub log_probs: Vec<f32>,
    /// Value estimate of each state
    pub values: Vec<f32>,
}

impl Prediction {
    /// Create a new prediction.
    pub fn new(actions: Vec<Action>, log_probs: Vec<f32>, values: Vec<f32>) -> Self {
        Self {
            actions,
            log_probs,
            values,
        }
    }

    /// Check that all three batches are non-empty and match `batch_size`.
    pub fn validate(&self, batch_size: usize) -> Result<()> {
        let aligned = self.actions.len() == batch_size
            && self.log_probs.len() == batch_size
            && self.values.len() == batch_size;
        if batch_size == 0 || !aligned {
            return Err(AgentError::MalformedPrediction {
                batch_size,
                actions: self.actions.len(),
                log_probs: self.log_probs.len(),
                values: self.values.len(),
            });
        }
        Ok(())
    }

    /// Take `(action, log_p, value)` at index 0 of a single-state prediction.
    pub fn into_first(self) -> Result<(Action, f32, f32)> {
        self.validate(1)?;
        let Prediction {
            actions,
            log_probs,
            values,
        } = self;
        match actions.into_iter().next() {
            Some(action) => Ok((action, log_probs[0], values[0])),
            None => Err(AgentError::MalformedPrediction {
                batch_size: 1,
                actions: 0,
                log_probs: log_probs.len(),
                values: values.len(),
            }),
        }
    }
}

/// Policy/value function consumed by the interaction loop.
///
/// From the loop's point of view this is a pure function of the state
/// batch. Implementations that hold a model behind a lock or a channel do
/// so internally.
pub trait Predictor {
    /// Predict actions, log probabilities and values for a batch of states.
    fn predict(&self, states: &[Observation]) -> Result<Prediction>;
}

impl<F> Predictor for F
where
    F: Fn(&[Observation]) -> Result<Prediction>,
{
    fn predict(&self, states: &[Observation]) -> Result<Prediction> {
        self(states)
    }
}
