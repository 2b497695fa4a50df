//! Actor-side components.
//!
//! - `lookahead`: action selection with a one-step cached prediction
//! - `agent`: loop + accumulator + estimator for one actor

pub mod agent;
pub mod lookahead;


pub use agent::{EpisodeStats, PpoAgent};
pub use lookahead::{InteractionLoop, Phase};
