//! PPO agent for one actor: interaction loop, trajectory and estimator.
//!
//! Each actor owns its own agent. Nothing here is shared between actors, so
//! running several of them on separate threads needs no locking; the owner
//! only ships finished [`TrainingTrajectory`] values to the learner.

use crate::actors::lookahead::{InteractionLoop, Phase};
use crate::algorithms::{AdvantageEstimator, GaeConfig, TrainingTrajectory};
use crate::buffers::TrajectoryAccumulator;
use crate::core::{Action, AgentError, Result, Transition};
use crate::environment::{Environment, Feedback};
use crate::predictor::Predictor;

/// Summary of one call to [`PpoAgent::run_episode`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EpisodeStats {
    /// Environment steps taken
    pub steps: usize,
    /// Sum of rewards
    pub total_reward: f32,
    /// Whether the episode ended (false if cut by `max_steps`)
    pub done: bool,
    /// Predictor invocations during the episode
    pub predictor_calls: usize,
}

/// Agent with one-step lookahead and GAE post-processing.
pub struct PpoAgent<P, I = ()> {
    interaction: InteractionLoop<P>,
    trajectory: TrajectoryAccumulator<I>,
    estimator: AdvantageEstimator,
}

impl<P: Predictor, I> PpoAgent<P, I> {
    /// Create an agent; fails if `config` is out of range.
    pub fn new(predictor: P, config: GaeConfig) -> Result<Self> {
        Ok(Self {
            interaction: InteractionLoop::new(predictor),
            trajectory: TrajectoryAccumulator::new(),
            estimator: AdvantageEstimator::new(config)?,
        })
    }

    /// Choose an action for `state` (ignored when a lookahead is cached).
    pub fn select_action(&mut self, state: &[f32]) -> Result<Action> {
        self.interaction.select_action(state)
    }

    /// Complete the current step and append it to the trajectory.
    ///
    /// Returns the appended transition. A step the accumulator rejects
    /// invalidates the whole segment: the partial trajectory is dropped and
    /// the loop goes back to cold.
    pub fn handle_env_feedback(
        &mut self,
        next_state: &[f32],
        reward: f32,
        done: bool,
        info: I,
    ) -> Result<&Transition<I>> {
        let transition = self.interaction.ingest_feedback(next_state, reward, done, info)?;
        if let Err(e) = self.trajectory.push(transition) {
            log::warn!("Rejected step after {} collected steps: {}", self.trajectory.len(), e);
            self.discard_trajectory();
            return Err(e);
        }
        self.trajectory.last().ok_or(AgentError::EmptyTrajectory)
    }

    /// Finalize and post-process the collected steps, emptying the buffer.
    ///
    /// The lookahead cache is left alone, so a segment cut mid-episode can
    /// be continued by stepping manually with `select_action` and
    /// `handle_env_feedback`.
    pub fn get_trajectory(&mut self) -> Result<TrainingTrajectory> {
        let raw = self.trajectory.finalize()?;
        self.estimator.process(raw)
    }

    /// Return the interaction loop to cold. Call before a new episode.
    pub fn reset(&mut self) {
        self.interaction.reset();
    }

    /// Drop the partial trajectory and any cached prediction.
    pub fn discard_trajectory(&mut self) {
        if !self.trajectory.is_empty() {
            log::debug!("Discarding partial trajectory of {} steps", self.trajectory.len());
        }
        self.trajectory.clear();
        self.interaction.reset();
    }

    /// Steps collected since the last `get_trajectory`.
    pub fn trajectory_len(&self) -> usize {
        self.trajectory.len()
    }

    /// Collected transitions, in step order.
    pub fn transitions(&self) -> &[Transition<I>] {
        self.trajectory.transitions()
    }

    /// Phase of the interaction loop.
    pub fn phase(&self) -> &Phase {
        self.interaction.phase()
    }

    /// Total predictor invocations since construction.
    pub fn predictor_calls(&self) -> usize {
        self.interaction.predictor_calls()
    }

    /// The wrapped predictor.
    pub fn predictor(&self) -> &P {
        self.interaction.predictor()
    }

    /// Mutable access to the predictor, e.g. to load new weights.
    pub fn predictor_mut(&mut self) -> &mut P {
        self.interaction.predictor_mut()
    }

    /// Estimator parameters.
    pub fn gae_config(&self) -> &GaeConfig {
        self.estimator.config()
    }

    /// Play one episode from a fresh environment reset.
    ///
    /// Starts cold, then alternates select/step/feedback until the
    /// environment reports `done` or `max_steps` steps were taken. The
    /// steps stay in the trajectory until [`get_trajectory`](Self::get_trajectory).
    ///
    /// Fails with `Sequencing` if the collected steps end without `done`
    /// (a previous episode was cut by `max_steps`): appending a new episode
    /// there would let its advantages flow back into the old one. Call
    /// `get_trajectory` or `discard_trajectory` first.
    pub fn run_episode<E>(&mut self, env: &mut E, max_steps: usize) -> Result<EpisodeStats>
    where
        E: Environment<Info = I>,
    {
        if self.trajectory.last().is_some_and(|t| !t.done) {
            return Err(AgentError::Sequencing {
                operation: "run_episode",
                phase: "holding an unfinished episode",
            });
        }

        self.interaction.reset();
        let calls_before = self.predictor_calls();
        let mut stats = EpisodeStats::default();
        let mut state = env.reset()?;

        while stats.steps < max_steps {
            let action = self.select_action(&state)?;
            let Feedback {
                next_state,
                reward,
                done,
                info,
            } = env.step(&action)?;

            stats.steps += 1;
            stats.total_reward += reward;
            self.handle_env_feedback(&next_state, reward, done, info)?;

            if done {
                stats.done = true;
                break;
            }
            state = next_state;
        }

        stats.predictor_calls = self.predictor_calls() - calls_before;
        log::debug!(
            "Episode finished: steps={}, reward={:.3}, done={}, predictor_calls={}",
            stats.steps,
            stats.total_reward,
            stats.done,
            stats.predictor_calls
        );
        Ok(stats)
    }
}
