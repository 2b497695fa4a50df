//! Turns a raw trajectory into training targets.
//!
//! [`AdvantageEstimator::process`] consumes a [`RawTrajectory`] and returns a
//! new [`TrainingTrajectory`]. Rewards, done flags, bootstrap values and
//! diagnostic payloads stop here; the learner only sees
//! `cur_state, action, log_p, adv, old_value, target_value`.

use serde::{Deserialize, Serialize};

use super::gae::{compute_gae, GaeConfig};
use crate::buffers::trajectory::check_step_shape;
use crate::buffers::RawTrajectory;
use crate::core::{Action, Observation, Result};

/// Learner-facing trajectory. Every column has the same length N.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingTrajectory {
    /// States at which actions were chosen
    pub cur_states: Vec<Observation>,
    /// Actions taken
    pub actions: Vec<Action>,
    /// Behavior log probabilities
    pub log_probs: Vec<f32>,
    /// GAE advantages (not normalized)
    pub advantages: Vec<f32>,
    /// Value estimates at collection time, for value-loss clipping
    pub old_values: Vec<f32>,
    /// Regression targets `advantages + old_values`
    pub target_values: Vec<f32>,
}

impl TrainingTrajectory {
    /// Number of steps.
    pub fn len(&self) -> usize {
        self.advantages.len()
    }

    /// Check if the trajectory has no steps.
    pub fn is_empty(&self) -> bool {
        self.advantages.is_empty()
    }

    /// Append another trajectory's steps after this one's.
    ///
    /// Each part must already have been processed on its own; advantages do
    /// not flow across the seam. Fails with `ShapeMismatch` if `other` has a
    /// different observation width or action shape.
    pub fn concat(mut self, other: TrainingTrajectory) -> Result<Self> {
        if let (Some(state), Some(action)) = (self.cur_states.first(), self.actions.first()) {
            for (s, a) in other.cur_states.iter().zip(&other.actions) {
                check_step_shape(state, action, s, a)?;
            }
        }
        self.cur_states.extend(other.cur_states);
        self.actions.extend(other.actions);
        self.log_probs.extend(other.log_probs);
        self.advantages.extend(other.advantages);
        self.old_values.extend(other.old_values);
        self.target_values.extend(other.target_values);
        Ok(self)
    }
}

/// GAE post-processor with its own discount and trace-decay.
#[derive(Debug, Clone)]
pub struct AdvantageEstimator {
    config: GaeConfig,
}

impl AdvantageEstimator {
    /// Create an estimator, rejecting out-of-range parameters.
    pub fn new(config: GaeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Parameters this estimator was built with.
    pub fn config(&self) -> &GaeConfig {
        &self.config
    }

    /// Compute advantages and value targets for a complete trajectory.
    ///
    /// Fails with `LengthMismatch` if any column disagrees on the step
    /// count, and with `EmptyTrajectory` for N = 0.
    pub fn process<I>(&self, raw: RawTrajectory<I>) -> Result<TrainingTrajectory> {
        raw.validate()?;

        let advantages = compute_gae(
            &raw.rewards,
            &raw.values,
            &raw.next_values,
            &raw.dones,
            self.config.gamma,
            self.config.gae_lambda,
        )?;

        let non_finite = advantages.iter().filter(|a| !a.is_finite()).count();
        if non_finite > 0 {
            log::warn!(
                "Found {} non-finite advantages in trajectory of {} steps",
                non_finite,
                advantages.len()
            );
        }

        let target_values: Vec<f32> = advantages
            .iter()
            .zip(&raw.values)
            .map(|(a, v)| a + v)
            .collect();

        log::debug!(
            "Processed trajectory: {} steps, {} episode ends",
            advantages.len(),
            raw.dones.iter().filter(|&&d| d).count()
        );

        let RawTrajectory {
            cur_states,
            actions,
            log_probs,
            values,
            ..
        } = raw;

        Ok(TrainingTrajectory {
            cur_states,
            actions,
            log_probs,
            advantages,
            old_values: values,
            target_values,
        })
    }
}

impl Default for AdvantageEstimator {
    fn default() -> Self {
        Self {
            config: GaeConfig::default(),
        }
    }
}
