//! Action selection with one-step lookahead caching.
//!
//! Feedback for step t already requires a predictor pass on the next state
//! (its value is step t's bootstrap target). That same pass also yields the
//! action and log-probability for step t+1, so the loop caches it and the
//! following `select_action` consumes the cache instead of predicting again.
//! An N-step episode therefore costs N+1 predictor calls, not 2N.
//!
//! # Phases
//!
//! ```text
//!            select_action(state)             ingest_feedback(next, ..)
//!   Cold ───────────────────────► Acting ─────────────────────────► Warm
//!                                   ▲                                  │
//!                                   └──────── select_action(_) ────────┘
//! ```
//!
//! Any other call order is a sequencing error and leaves the phase as it was.
//! `reset` returns to `Cold` from anywhere.

use crate::core::{Action, AgentError, Lookahead, Observation, Result, Selection, Transition};
use crate::predictor::Predictor;

/// Where the loop is within the current step.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Phase {
    /// No cached prediction; the next selection calls the predictor.
    #[default]
    Cold,
    /// An action was handed out and its feedback is pending.
    Acting(Selection),
    /// Feedback arrived; the prediction for the reached state is cached.
    Warm(Lookahead),
}

impl Phase {
    /// Short name used in sequencing errors and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Cold => "cold",
            Phase::Acting(_) => "awaiting feedback",
            Phase::Warm(_) => "warm",
        }
    }
}

/// Interaction loop for one actor and one episode at a time.
pub struct InteractionLoop<P> {
    predictor: P,
    phase: Phase,
    predictor_calls: usize,
}

impl<P: Predictor> InteractionLoop<P> {
    /// Create a cold loop around `predictor`.
    pub fn new(predictor: P) -> Self {
        Self {
            predictor,
            phase: Phase::Cold,
            predictor_calls: 0,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Whether a cached lookahead is available.
    pub fn is_warm(&self) -> bool {
        matches!(self.phase, Phase::Warm(_))
    }

    /// Total predictor invocations since construction.
    pub fn predictor_calls(&self) -> usize {
        self.predictor_calls
    }

    /// The wrapped predictor.
    pub fn predictor(&self) -> &P {
        &self.predictor
    }

    /// Mutable access to the predictor, e.g. to load new weights.
    ///
    /// A cached lookahead was computed with the previous weights; call
    /// [`reset`](Self::reset) as well if it must not be used.
    pub fn predictor_mut(&mut self) -> &mut P {
        &mut self.predictor
    }

    /// Drop any cached or pending prediction and return to `Cold`.
    pub fn reset(&mut self) {
        if !matches!(self.phase, Phase::Cold) {
            log::trace!("Lookahead reset from {}", self.phase.name());
        }
        self.phase = Phase::Cold;
    }

    fn predict_one(&mut self, state: &Observation) -> Result<(Action, f32, f32)> {
        self.predictor_calls += 1;
        self.predictor.predict(std::slice::from_ref(state))?.into_first()
    }

    /// Choose the action for the current step.
    ///
    /// When cold, predicts on `state`. When warm, `state` is ignored and the
    /// cached prediction for the state reached by the previous step is used.
    pub fn select_action(&mut self, state: &[f32]) -> Result<Action> {
        let selection = match std::mem::take(&mut self.phase) {
            pending @ Phase::Acting(_) => {
                self.phase = pending;
                return Err(AgentError::Sequencing {
                    operation: "select_action",
                    phase: self.phase.name(),
                });
            }
            Phase::Cold => {
                let cur_state = state.to_vec();
                let (action, log_p, value) = self.predict_one(&cur_state)?;
                Selection {
                    cur_state,
                    action,
                    log_p,
                    value,
                }
            }
            Phase::Warm(lookahead) => {
                if lookahead.terminal {
                    log::warn!(
                        "Consuming a lookahead computed from a terminal state; reset the loop between episodes"
                    );
                }
                lookahead.into_selection()
            }
        };

        let action = selection.action.clone();
        self.phase = Phase::Acting(selection);
        Ok(action)
    }

    /// Complete the current step with the environment's response.
    ///
    /// Always predicts on `next_state` exactly once: the value becomes this
    /// step's `next_value` and the whole prediction is cached for the next
    /// selection, including after a terminal step.
    pub fn ingest_feedback<I>(
        &mut self,
        next_state: &[f32],
        reward: f32,
        done: bool,
        info: I,
    ) -> Result<Transition<I>> {
        let selection = match std::mem::take(&mut self.phase) {
            Phase::Acting(selection) => selection,
            other => {
                self.phase = other;
                return Err(AgentError::Sequencing {
                    operation: "ingest_feedback",
                    phase: self.phase.name(),
                });
            }
        };

        let state = next_state.to_vec();
        let (action, log_p, value) = match self.predict_one(&state) {
            Ok(prediction) => prediction,
            Err(e) => {
                // Keep the pending step so the caller sees an unchanged loop
                self.phase = Phase::Acting(selection);
                return Err(e);
            }
        };

        self.phase = Phase::Warm(Lookahead {
            state,
            action,
            log_p,
            value,
            terminal: done,
        });

        Ok(Transition::complete(selection, reward, value, done, info))
    }
}
