//! Burn-backed predictor for discrete policies.
//!
//! Wraps any network that maps an observation batch to action logits and
//! state values. Rows are sampled from the categorical distribution given by
//! `softmax(logits)`, or taken greedily when exploration is disabled.

use burn::tensor::activation::softmax;
use burn::tensor::backend::Backend;
use burn::tensor::{Tensor, TensorData};

use super::{Prediction, Predictor};
use crate::core::{Action, AgentError, Observation, Result};

/// Actor-critic network with a categorical policy head.
///
/// Implementations are expected to be inference-only (e.g. `model.valid()`
/// on an autodiff model) so that collecting a rollout builds no graph.
pub trait PolicyValueNet<B: Backend> {
    /// Forward pass.
    ///
    /// - `obs`: `[batch, obs_size]`
    /// - returns `(logits [batch, n_actions], values [batch, 1])`
    fn forward(&self, obs: Tensor<B, 2>) -> (Tensor<B, 2>, Tensor<B, 2>);

    /// Observation size expected by the network.
    fn obs_size(&self) -> usize;
}

/// Predictor that runs a [`PolicyValueNet`] on a burn device.
pub struct ModelPredictor<B: Backend, M> {
    model: M,
    device: B::Device,
    explore: bool,
}

impl<B, M> ModelPredictor<B, M>
where
    B: Backend,
    M: PolicyValueNet<B>,
{
    /// Create a sampling predictor.
    pub fn new(model: M, device: B::Device) -> Self {
        Self {
            model,
            device,
            explore: true,
        }
    }

    /// Sample actions (`true`) or take the most probable action (`false`).
    pub fn with_exploration(mut self, explore: bool) -> Self {
        self.explore = explore;
        self
    }

    /// Current network.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Replace the network, e.g. after the learner publishes new weights.
    pub fn set_model(&mut self, model: M) {
        self.model = model;
    }

    fn observations_to_tensor(&self, states: &[Observation]) -> Result<Tensor<B, 2>> {
        let obs_size = self.model.obs_size();
        let mut flat = Vec::with_capacity(states.len() * obs_size);
        for state in states {
            if state.len() != obs_size {
                return Err(AgentError::ShapeMismatch {
                    field: "cur_state",
                    expected: obs_size,
                    actual: state.len(),
                });
            }
            flat.extend_from_slice(state);
        }
        let data = TensorData::new(flat, [states.len(), obs_size]);
        Ok(Tensor::from_data(data, &self.device))
    }

    fn pick(&self, row: &[f32]) -> usize {
        let n_actions = row.len();
        if !self.explore {
            return row
                .iter()
                .enumerate()
                .fold((0, f32::NEG_INFINITY), |best, (a, &p)| if p > best.1 { (a, p) } else { best })
                .0;
        }

        // Categorical sampling via cumulative sum; the last action absorbs
        // rounding when the probabilities do not sum to exactly 1.0
        let rand_val = fastrand::f32();
        let mut cumsum = 0.0;
        for (a, &p) in row.iter().enumerate() {
            cumsum += p;
            if rand_val < cumsum {
                return a;
            }
        }
        n_actions - 1
    }
}

fn to_vec<B: Backend, const D: usize>(tensor: Tensor<B, D>) -> Result<Vec<f32>> {
    tensor
        .into_data()
        .to_vec::<f32>()
        .map_err(|e| AgentError::Predictor(format!("{:?}", e)))
}

impl<B, M> Predictor for ModelPredictor<B, M>
where
    B: Backend,
    M: PolicyValueNet<B>,
{
    fn predict(&self, states: &[Observation]) -> Result<Prediction> {
        let batch_size = states.len();
        if batch_size == 0 {
            return Err(AgentError::Predictor("empty state batch".to_string()));
        }

        let obs = self.observations_to_tensor(states)?;
        let (logits, values) = self.model.forward(obs);

        let [rows, n_actions] = logits.dims();
        if rows != batch_size || n_actions == 0 {
            return Err(AgentError::Predictor(format!(
                "logits shape [{}, {}] does not match batch of {}",
                rows, n_actions, batch_size
            )));
        }

        let probs = to_vec(softmax(logits, 1))?;
        let values: Tensor<B, 1> = values.flatten(0, 1);
        let values = to_vec(values)?;

        let mut actions = Vec::with_capacity(batch_size);
        let mut log_probs = Vec::with_capacity(batch_size);
        for row in probs.chunks(n_actions) {
            let selected = self.pick(row);
            actions.push(Action::Discrete(selected as u32));
            log_probs.push((row[selected] + 1e-8).ln());
        }

        let prediction = Prediction::new(actions, log_probs, values);
        prediction.validate(batch_size)?;
        Ok(prediction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type B = NdArray<f32>;

    /// Fixed logits for every row; value is the sum of the observation.
    struct FixedNet {
        obs_size: usize,
        logits: Vec<f32>,
    }

    impl PolicyValueNet<B> for FixedNet {
        fn forward(&self, obs: Tensor<B, 2>) -> (Tensor<B, 2>, Tensor<B, 2>) {
            let [batch, _] = obs.dims();
            let n_actions = self.logits.len();
            let rows: Vec<f32> = (0..batch).flat_map(|_| self.logits.iter().copied()).collect();
            let logits = Tensor::from_data(TensorData::new(rows, [batch, n_actions]), &obs.device());
            let values = obs.sum_dim(1);
            (logits, values)
        }

        fn obs_size(&self) -> usize {
            self.obs_size
        }
    }

    fn predictor(logits: Vec<f32>) -> ModelPredictor<B, FixedNet> {
        ModelPredictor::new(FixedNet { obs_size: 2, logits }, Default::default())
    }

    #[test]
    fn test_greedy_picks_most_probable_action() {
        let p = predictor(vec![0.0, 3.0, 1.0]).with_exploration(false);
        let out = p.predict(&[vec![1.0, 2.0]]).unwrap();

        assert_eq!(out.actions, vec![Action::Discrete(1)]);
        let expected_p = 3.0f32.exp() / (1.0 + 3.0f32.exp() + 1.0f32.exp());
        assert!((out.log_probs[0] - expected_p.ln()).abs() < 1e-4);
        assert!((out.values[0] - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_sampling_peaked_policy() {
        let p = predictor(vec![30.0, 0.0]);
        let out = p.predict(&[vec![0.5, 0.5], vec![1.0, -1.0]]).unwrap();

        assert_eq!(out.actions, vec![Action::Discrete(0), Action::Discrete(0)]);
        assert!(out.log_probs.iter().all(|lp| lp.abs() < 1e-4));
        assert!((out.values[0] - 1.0).abs() < 1e-6);
        assert!(out.values[1].abs() < 1e-6);
    }

    #[test]
    fn test_observation_width_mismatch() {
        let p = predictor(vec![0.0, 0.0]);
        let err = p.predict(&[vec![1.0, 2.0, 3.0]]).unwrap_err();
        assert_eq!(
            err,
            AgentError::ShapeMismatch {
                field: "cur_state",
                expected: 2,
                actual: 3,
            }
        );
    }

    #[test]
    fn test_empty_batch_is_error() {
        let p = predictor(vec![0.0, 0.0]);
        assert!(matches!(p.predict(&[]), Err(AgentError::Predictor(_))));
    }

    #[test]
    fn test_set_model_swaps_policy() {
        let mut p = predictor(vec![5.0, 0.0]).with_exploration(false);
        assert_eq!(p.predict(&[vec![0.0, 0.0]]).unwrap().actions[0], Action::Discrete(0));

        p.set_model(FixedNet {
            obs_size: 2,
            logits: vec![0.0, 5.0],
        });
        assert_eq!(p.predict(&[vec![0.0, 0.0]]).unwrap().actions[0], Action::Discrete(1));
        assert_eq!(p.model().logits, vec![0.0, 5.0]);
    }
}
