//! # PPO agent core: lookahead interaction and GAE post-processing
//!
//! Single-actor building blocks for on-policy collection:
//!
//! ```text
//! ┌──────────────────────────────── PpoAgent ───────────────────────────────┐
//! │                                                                         │
//! │  select_action ──► InteractionLoop ──► ingest_feedback                  │
//! │                    Cold/Acting/Warm        │                            │
//! │                         │                  ▼                            │
//! │                     Predictor     TrajectoryAccumulator                 │
//! │                  (N+1 calls / N steps)     │ finalize                   │
//! │                                            ▼                            │
//! │                                      RawTrajectory                      │
//! │                                            │ AdvantageEstimator (GAE)   │
//! │                                            ▼                            │
//! │                                   TrainingTrajectory ──► learner        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The feedback call predicts on the next state once; its value is the
//! current step's bootstrap target and its action is cached for the next
//! step. Advantage estimation uses the per-step bootstrap values and stops
//! at `done` boundaries.
//!
//! Each actor owns its own agent. Running many actors in parallel is left to
//! the caller and needs no synchronization inside this crate.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ppo_agent::{GaeConfig, PpoAgent};
//!
//! let mut agent = PpoAgent::new(predictor, GaeConfig::new().with_gamma(0.99))?;
//! let stats = agent.run_episode(&mut env, 1000)?;
//! let batch = agent.get_trajectory()?;   // cur_states, actions, log_probs,
//!                                        // advantages, old_values, target_values
//! ```

pub mod actors;
pub mod algorithms;
pub mod buffers;
pub mod core;
pub mod environment;
pub mod predictor;

pub use crate::core::{Action, AgentError, ConfigError, Lookahead, Observation, Result, Selection, Transition};

pub use actors::{EpisodeStats, InteractionLoop, Phase, PpoAgent};
pub use algorithms::{compute_gae, td_residuals, AdvantageEstimator, GaeConfig, TrainingTrajectory};
pub use buffers::{RawTrajectory, TrajectoryAccumulator};
pub use environment::{Environment, Feedback};
pub use predictor::{ModelPredictor, PolicyValueNet, Prediction, Predictor};
