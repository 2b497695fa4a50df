//! Post-episode computation of training targets.
//!
//! - `gae`: Generalized Advantage Estimation over per-step bootstrap values
//! - `estimator`: raw trajectory -> training trajectory transform

pub mod estimator;
pub mod gae;

#[cfg(test)]
mod tests;

pub use estimator::{AdvantageEstimator, TrainingTrajectory};
pub use gae::{compute_gae, td_residuals, GaeConfig};
