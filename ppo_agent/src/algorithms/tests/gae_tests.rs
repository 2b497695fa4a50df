//! Tests for Generalized Advantage Estimation over per-step bootstrap values.
//!
//! They cover:
//! - A hand-computed three-step episode
//! - Terminal masking and bootstrapping through `next_values`
//! - Lambda extremes
//! - Single-step trajectories
//! - Step-count alignment errors

use crate::algorithms::gae::{compute_gae, td_residuals};
use crate::core::AgentError;

const GAMMA: f32 = 0.99;
const LAMBDA: f32 = 0.95;

fn assert_close(actual: f32, expected: f32, what: &str) {
    assert!(
        (actual - expected).abs() < 1e-5,
        "{}: expected {}, got {}",
        what,
        expected,
        actual
    );
}

// ============================================================================
// Worked example
// ============================================================================

/// values = rewards = 1, next_values = [1, 1, 0], episode ends at the last step.
#[test]
fn test_three_step_episode_by_hand() {
    let rewards = [1.0, 1.0, 1.0];
    let values = [1.0, 1.0, 1.0];
    let next_values = [1.0, 1.0, 0.0];
    let dones = [false, false, true];

    let deltas = td_residuals(&rewards, &values, &next_values, &dones, GAMMA).unwrap();
    assert_close(deltas[0], 0.99, "delta_0");
    assert_close(deltas[1], 0.99, "delta_1");
    assert_close(deltas[2], 0.0, "delta_2");

    let adv = compute_gae(&rewards, &values, &next_values, &dones, GAMMA, LAMBDA).unwrap();
    assert_close(adv[2], 0.0, "adv_2");
    assert_close(adv[1], 0.99 + 0.99 * 0.95 * 0.0, "adv_1");
    assert_close(adv[0], 0.99 + 0.99 * 0.95 * 0.99, "adv_0");
    assert!((adv[0] - 1.9216).abs() < 1e-3);
}

// ============================================================================
// Terminal masking and bootstrap
// ============================================================================

/// A terminal last step ignores its next_value entirely.
#[test]
fn test_terminal_step_has_no_bootstrap() {
    let rewards = [0.3, 2.0];
    let values = [0.1, 0.7];
    let dones = [false, true];

    let with_big_bootstrap =
        compute_gae(&rewards, &values, &[0.5, 100.0], &dones, GAMMA, LAMBDA).unwrap();
    let with_zero_bootstrap =
        compute_gae(&rewards, &values, &[0.5, 0.0], &dones, GAMMA, LAMBDA).unwrap();

    assert_eq!(with_big_bootstrap[1], 2.0 + GAMMA * 0.0 * 100.0 - 0.7);
    assert_eq!(with_big_bootstrap, with_zero_bootstrap);
}

/// A segment cut mid-episode bootstraps from the recorded next_value.
#[test]
fn test_truncated_segment_bootstraps_last_step() {
    let rewards = [1.0];
    let values = [0.5];
    let dones = [false];

    let high = compute_gae(&rewards, &values, &[2.0], &dones, GAMMA, LAMBDA).unwrap();
    let zero = compute_gae(&rewards, &values, &[0.0], &dones, GAMMA, LAMBDA).unwrap();

    assert_close(high[0], 1.0 + GAMMA * 2.0 - 0.5, "bootstrapped");
    assert_close(zero[0], 0.5, "zero bootstrap");
}

/// The step that ends an episode does not receive advantage from the
/// steps recorded after it.
#[test]
fn test_done_blocks_backward_flow() {
    let rewards = [1.0, 1.0, 50.0, 50.0];
    let values = [0.0; 4];
    let next_values = [0.0; 4];
    let dones = [false, true, false, false];

    let adv = compute_gae(&rewards, &values, &next_values, &dones, GAMMA, LAMBDA).unwrap();

    assert_close(adv[1], 1.0, "episode end");
    assert_close(adv[0], 1.0 + GAMMA * LAMBDA * 1.0, "first step");
    assert_close(adv[3], 50.0, "second episode last");
    assert_close(adv[2], 50.0 + GAMMA * LAMBDA * 50.0, "second episode first");
}

// ============================================================================
// Lambda extremes
// ============================================================================

#[test]
fn test_lambda_zero_is_one_step_td() {
    let rewards = [1.0, 2.0, 3.0];
    let values = [0.5, 0.8, 1.0];
    let next_values = [0.8, 1.0, 1.2];
    let dones = [false, false, false];

    let adv = compute_gae(&rewards, &values, &next_values, &dones, GAMMA, 0.0).unwrap();
    let deltas = td_residuals(&rewards, &values, &next_values, &dones, GAMMA).unwrap();

    assert_eq!(adv, deltas);
    assert_close(adv[2], 3.0 + GAMMA * 1.2 - 1.0, "adv_2");
}

#[test]
fn test_lambda_one_is_discounted_return_with_zero_values() {
    let rewards = [1.0, 1.0, 1.0];
    let zeros = [0.0; 3];
    let dones = [false, false, false];

    let adv = compute_gae(&rewards, &zeros, &zeros, &dones, GAMMA, 1.0).unwrap();

    assert_close(adv[2], 1.0, "A_2");
    assert!((adv[1] - 1.99).abs() < 1e-4);
    assert!((adv[0] - 2.9701).abs() < 1e-4);
}

#[test]
fn test_intermediate_lambda_interpolates() {
    let rewards = [1.0, 1.0, 1.0];
    let zeros = [0.0; 3];
    let dones = [false; 3];

    let adv_0 = compute_gae(&rewards, &zeros, &zeros, &dones, GAMMA, 0.0).unwrap();
    let adv_95 = compute_gae(&rewards, &zeros, &zeros, &dones, GAMMA, 0.95).unwrap();
    let adv_1 = compute_gae(&rewards, &zeros, &zeros, &dones, GAMMA, 1.0).unwrap();

    assert!(adv_95[0] > adv_0[0] && adv_95[0] < adv_1[0]);
}

// ============================================================================
// Single step
// ============================================================================

#[test]
fn test_single_step_is_plain_residual() {
    for &done in &[false, true] {
        let adv = compute_gae(&[0.25], &[0.75], &[1.5], &[done], GAMMA, LAMBDA).unwrap();
        let mask = if done { 0.0 } else { 1.0 };
        assert_eq!(adv.len(), 1);
        assert_eq!(adv[0], 0.25 + GAMMA * mask * 1.5 - 0.75);
    }
}

// ============================================================================
// Alignment
// ============================================================================

#[test]
fn test_mismatched_values_rejected() {
    let err = compute_gae(&[1.0, 1.0], &[0.0], &[0.0, 0.0], &[false, false], GAMMA, LAMBDA)
        .unwrap_err();
    assert_eq!(
        err,
        AgentError::LengthMismatch {
            field: "values",
            expected: 2,
            actual: 1,
        }
    );
}

#[test]
fn test_mismatched_next_values_rejected() {
    let err = compute_gae(&[1.0], &[0.0], &[0.0, 0.0], &[false], GAMMA, LAMBDA).unwrap_err();
    assert!(matches!(
        err,
        AgentError::LengthMismatch { field: "next_values", expected: 1, actual: 2 }
    ));
}

#[test]
fn test_mismatched_dones_rejected() {
    let err = td_residuals(&[1.0, 2.0, 3.0], &[0.0; 3], &[0.0; 3], &[true], GAMMA).unwrap_err();
    assert!(matches!(
        err,
        AgentError::LengthMismatch { field: "dones", expected: 3, actual: 1 }
    ));
}
