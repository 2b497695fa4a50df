//! Trajectory storage for a single actor.
//!
//! - `TrajectoryAccumulator`: append-only record of one episode or segment
//! - `RawTrajectory`: its columnar export, consumed by advantage estimation

pub mod trajectory;


pub use trajectory::{RawTrajectory, TrajectoryAccumulator};
