//! Core data types shared by the interaction loop, buffers and estimator.

pub mod error;
pub mod transition;

pub use error::{AgentError, ConfigError, Result};
pub use transition::{Action, Lookahead, Observation, Selection, Transition};
