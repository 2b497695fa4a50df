//! Transition types for on-policy collection.
//!
//! - `Action`: discrete or continuous action
//! - `Selection`: the half of a transition known at action-selection time
//! - `Lookahead`: a prediction cached for the state reached by the last step
//! - `Transition`: a complete per-step record, ready for the accumulator

use serde::{Deserialize, Serialize};

/// Observation vector for a single environment.
pub type Observation = Vec<f32>;

/// Action representation (discrete or continuous).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Discrete action index
    Discrete(u32),
    /// Continuous action vector
    Continuous(Vec<f32>),
}

impl Action {
    /// Discrete action index, or `None` for continuous actions.
    pub fn as_discrete(&self) -> Option<u32> {
        match self {
            Action::Discrete(a) => Some(*a),
            Action::Continuous(_) => None,
        }
    }

    /// Continuous action vector, or `None` for discrete actions.
    pub fn as_continuous(&self) -> Option<&[f32]> {
        match self {
            Action::Discrete(_) => None,
            Action::Continuous(a) => Some(a),
        }
    }

    /// Number of floats needed to represent this action.
    pub fn dim(&self) -> usize {
        match self {
            Action::Discrete(_) => 1,
            Action::Continuous(a) => a.len(),
        }
    }

    /// Whether two actions come from the same action space shape.
    pub fn same_shape(&self, other: &Action) -> bool {
        match (self, other) {
            (Action::Discrete(_), Action::Discrete(_)) => true,
            (Action::Continuous(a), Action::Continuous(b)) => a.len() == b.len(),
            _ => false,
        }
    }

    /// Convert to floats for environment stepping and storage.
    pub fn as_floats(&self) -> Vec<f32> {
        match self {
            Action::Discrete(a) => vec![*a as f32],
            Action::Continuous(a) => a.clone(),
        }
    }
}

/// Policy output for the state an action was chosen at.
///
/// This is the open half of a transition: it exists between
/// `select_action` and the feedback that completes it.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// State at which the action was chosen
    pub cur_state: Observation,
    /// Action chosen at `cur_state`
    pub action: Action,
    /// Log probability of `action` under the behavior policy
    pub log_p: f32,
    /// Value estimate V(cur_state)
    pub value: f32,
}

/// Prediction cached for the state reached by the previous step.
///
/// The next `select_action` consumes it instead of calling the predictor again.
#[derive(Debug, Clone, PartialEq)]
pub struct Lookahead {
    /// State the prediction was computed for
    pub state: Observation,
    /// Action the policy picked for `state`
    pub action: Action,
    /// Log probability of `action`
    pub log_p: f32,
    /// Value estimate V(state)
    pub value: f32,
    /// Whether `state` was reached by a terminating step
    pub terminal: bool,
}

impl Lookahead {
    /// Turn the cached prediction into the selection for the upcoming step.
    pub fn into_selection(self) -> Selection {
        Selection {
            cur_state: self.state,
            action: self.action,
            log_p: self.log_p,
            value: self.value,
        }
    }
}

/// Complete per-step record.
///
/// `next_value` is the value of the state reached by *this* step's action;
/// it is the bootstrap target consumed by advantage estimation.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<I = ()> {
    /// State at which the action was chosen
    pub cur_state: Observation,
    /// Action taken
    pub action: Action,
    /// Log probability of `action` at selection time
    pub log_p: f32,
    /// Value estimate V(cur_state)
    pub value: f32,
    /// Reward received after taking `action`
    pub reward: f32,
    /// Value estimate of the resulting state
    pub next_value: f32,
    /// Episode terminated after this step
    pub done: bool,
    /// Diagnostic payload, passed through unmodified
    pub info: I,
}

impl<I> Transition<I> {
    /// Complete a selection with the environment's feedback.
    pub fn complete(selection: Selection, reward: f32, next_value: f32, done: bool, info: I) -> Self {
        Self {
            cur_state: selection.cur_state,
            action: selection.action,
            log_p: selection.log_p,
            value: selection.value,
            reward,
            next_value,
            done,
            info,
        }
    }

    /// Observation dimensionality.
    pub fn obs_dim(&self) -> usize {
        self.cur_state.len()
    }
}
