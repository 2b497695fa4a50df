//! Single-environment abstraction used by the episode driver.
//!
//! The agent core never simulates anything; an [`Environment`] is whatever
//! produces the next observation, reward and termination flag for an action.

use crate::core::{Action, Observation, Result};

/// Environment response to one action.
#[derive(Debug, Clone, PartialEq)]
pub struct Feedback<I = ()> {
    /// Observation after the step
    pub next_state: Observation,
    /// Reward received
    pub reward: f32,
    /// Episode ended (terminal or truncated by the environment)
    pub done: bool,
    /// Diagnostic payload, forwarded untouched
    pub info: I,
}

impl<I> Feedback<I> {
    /// Create a new feedback record.
    pub fn new(next_state: Observation, reward: f32, done: bool, info: I) -> Self {
        Self {
            next_state,
            reward,
            done,
            info,
        }
    }
}

/// Synchronous environment driven by one actor.
pub trait Environment {
    /// Diagnostic payload type attached to each step.
    type Info;

    /// Start a new episode and return its first observation.
    fn reset(&mut self) -> Result<Observation>;

    /// Apply `action` and return the environment's response.
    fn step(&mut self, action: &Action) -> Result<Feedback<Self::Info>>;
}
