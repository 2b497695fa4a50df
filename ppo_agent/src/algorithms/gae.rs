//! Generalized Advantage Estimation.
//!
//! GAE provides a family of policy gradient estimators parameterized by λ:
//! - λ = 0: one-step TD (low variance, high bias)
//! - λ = 1: Monte Carlo (high variance, low bias)
//! - λ ∈ (0, 1): interpolation
//!
//! ## Formula
//!
//! ```text
//! mask_t = 0 if done_t else 1
//! δ_t    = r_t + γ * mask_t * V'_t - V_t
//! A_{N-1} = δ_{N-1}
//! A_t    = δ_t + γλ * mask_t * A_{t+1}
//! ```
//!
//! `V'_t` is the value of the state reached by step t, recorded per step.
//! Unlike a single trailing bootstrap value, this keeps segments that were
//! cut mid-episode correct at every step, and the mask stops the recursion
//! at episode boundaries.
//!
//! ## References
//!
//! - Schulman et al., "High-Dimensional Continuous Control Using
//!   Generalized Advantage Estimation" (2016)

use serde::{Deserialize, Serialize};

use crate::core::{AgentError, ConfigError, Result};

/// Discount and trace-decay parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaeConfig {
    /// Discount factor γ
    pub gamma: f32,
    /// GAE trace-decay λ
    pub gae_lambda: f32,
}

impl Default for GaeConfig {
    fn default() -> Self {
        Self {
            gamma: 0.99,
            gae_lambda: 0.95,
        }
    }
}

impl GaeConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set discount factor.
    pub fn with_gamma(mut self, gamma: f32) -> Self {
        self.gamma = gamma;
        self
    }

    /// Set GAE lambda.
    pub fn with_gae_lambda(mut self, gae_lambda: f32) -> Self {
        self.gae_lambda = gae_lambda;
        self
    }

    /// Validate that both parameters lie in [0, 1].
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        check_unit_range("gamma", self.gamma)?;
        check_unit_range("gae_lambda", self.gae_lambda)?;
        Ok(())
    }
}

fn check_unit_range(field: &'static str, value: f32) -> std::result::Result<(), ConfigError> {
    // NaN fails both comparisons, so `contains` rejects it
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::OutOfRange {
            field,
            value,
            min: 0.0,
            max: 1.0,
        });
    }
    Ok(())
}

fn check_aligned(rewards: &[f32], values: &[f32], next_values: &[f32], dones: &[bool]) -> Result<usize> {
    let n = rewards.len();
    if n == 0 {
        return Err(AgentError::EmptyTrajectory);
    }
    for (field, len) in [
        ("values", values.len()),
        ("next_values", next_values.len()),
        ("dones", dones.len()),
    ] {
        if len != n {
            return Err(AgentError::LengthMismatch {
                field,
                expected: n,
                actual: len,
            });
        }
    }
    Ok(n)
}

/// One-step TD residuals `δ_t = r_t + γ * mask_t * V'_t - V_t`.
pub fn td_residuals(
    rewards: &[f32],
    values: &[f32],
    next_values: &[f32],
    dones: &[bool],
    gamma: f32,
) -> Result<Vec<f32>> {
    check_aligned(rewards, values, next_values, dones)?;

    Ok(rewards
        .iter()
        .zip(values)
        .zip(next_values)
        .zip(dones)
        .map(|(((&r, &v), &next_v), &done)| {
            let mask = if done { 0.0 } else { 1.0 };
            r + gamma * mask * next_v - v
        })
        .collect())
}

/// Compute GAE advantages for a single trajectory.
///
/// # Arguments
///
/// * `rewards` - rewards received [N]
/// * `values` - value estimates V(s_t) [N]
/// * `next_values` - value estimates of the state reached by each step [N]
/// * `dones` - episode termination flags [N]
/// * `gamma` - discount factor
/// * `gae_lambda` - GAE λ parameter
///
/// # Errors
///
/// `EmptyTrajectory` when N = 0, `LengthMismatch` when the four slices do
/// not share N.
pub fn compute_gae(
    rewards: &[f32],
    values: &[f32],
    next_values: &[f32],
    dones: &[bool],
    gamma: f32,
    gae_lambda: f32,
) -> Result<Vec<f32>> {
    let mut advantages = td_residuals(rewards, values, next_values, dones, gamma)?;

    // A_{N-1} = δ_{N-1}; walk back from N-2
    for t in (0..advantages.len() - 1).rev() {
        let mask = if dones[t] { 0.0 } else { 1.0 };
        advantages[t] += gamma * gae_lambda * mask * advantages[t + 1];
    }

    Ok(advantages)
}
