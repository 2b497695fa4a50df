//! Error types for the agent core.
//!
//! Three families of failure can occur while collecting and post-processing
//! a trajectory:
//! - Shape/alignment: columns or records that disagree on length or dimension
//! - Sequencing: interaction calls made out of order
//! - Predictor contract: malformed or failed predictor output
//!
//! None of them are retried. A failed step invalidates the trajectory it
//! belongs to and the owner is expected to discard it.

use std::fmt;

/// Result type for agent operations.
pub type Result<T> = std::result::Result<T, AgentError>;

/// Configuration validation error.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A parameter is outside its valid range.
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::OutOfRange { field, value, min, max } => {
                write!(f, "{} must be in [{}, {}], got {}", field, min, max, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors raised by the interaction loop, the accumulator and the estimator.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentError {
    /// A record's field has a different shape than the rest of the trajectory.
    ShapeMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    /// Trajectory columns disagree on the number of steps.
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    /// A trajectory with no steps cannot be processed.
    EmptyTrajectory,
    /// An interaction call was made in a phase that does not allow it.
    Sequencing {
        operation: &'static str,
        phase: &'static str,
    },
    /// The predictor returned batches that are empty or not index-aligned.
    MalformedPrediction {
        batch_size: usize,
        actions: usize,
        log_probs: usize,
        values: usize,
    },
    /// The predictor itself failed.
    Predictor(String),
    /// The environment failed to step or reset.
    Environment(String),
    /// Invalid configuration.
    Config(ConfigError),
}

impl fmt::Display for AgentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShapeMismatch { field, expected, actual } => {
                write!(
                    f,
                    "Shape mismatch in '{}': expected dimension {}, got {}",
                    field, expected, actual
                )
            }
            Self::LengthMismatch { field, expected, actual } => {
                write!(
                    f,
                    "Length mismatch in '{}': expected {} steps, got {}",
                    field, expected, actual
                )
            }
            Self::EmptyTrajectory => write!(f, "Trajectory is empty"),
            Self::Sequencing { operation, phase } => {
                write!(f, "Cannot call {} while the loop is {}", operation, phase)
            }
            Self::MalformedPrediction { batch_size, actions, log_probs, values } => {
                write!(
                    f,
                    "Malformed prediction for batch of {}: {} actions, {} log_probs, {} values",
                    batch_size, actions, log_probs, values
                )
            }
            Self::Predictor(msg) => write!(f, "Predictor error: {}", msg),
            Self::Environment(msg) => write!(f, "Environment error: {}", msg),
            Self::Config(e) => write!(f, "Config error: {}", e),
        }
    }
}

impl std::error::Error for AgentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for AgentError {
    fn from(e: ConfigError) -> Self {
        AgentError::Config(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = AgentError::LengthMismatch { field: "rewards", expected: 3, actual: 2 };
        assert_eq!(err.to_string(), "Length mismatch in 'rewards': expected 3 steps, got 2");

        let err = AgentError::Sequencing { operation: "ingest_feedback", phase: "cold" };
        assert_eq!(err.to_string(), "Cannot call ingest_feedback while the loop is cold");

        let err: AgentError = ConfigError::OutOfRange {
            field: "gamma",
            value: 1.5,
            min: 0.0,
            max: 1.0,
        }
        .into();
        assert_eq!(err.to_string(), "Config error: gamma must be in [0, 1], got 1.5");
    }

    #[test]
    fn test_config_error_is_source() {
        use std::error::Error;

        let err = AgentError::Config(ConfigError::OutOfRange {
            field: "gae_lambda",
            value: -0.1,
            min: 0.0,
            max: 1.0,
        });
        assert!(err.source().is_some());
        assert!(AgentError::EmptyTrajectory.source().is_none());
    }
}
