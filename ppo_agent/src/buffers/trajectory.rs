//! Append-only trajectory accumulator for one actor.
//!
//! Key characteristics:
//! - Preserves temporal order (no deduplication, no reordering)
//! - Rejects records whose observation or action shape differs from the
//!   first record, at push time and again when a raw trajectory is validated
//! - Exports a columnar [`RawTrajectory`] for batched post-processing

use crate::core::{Action, AgentError, Observation, Result, Transition};

/// Check a step's observation width and action shape against a reference step.
pub(crate) fn check_step_shape(
    reference_state: &[f32],
    reference_action: &Action,
    cur_state: &[f32],
    action: &Action,
) -> Result<()> {
    if cur_state.len() != reference_state.len() {
        return Err(AgentError::ShapeMismatch {
            field: "cur_state",
            expected: reference_state.len(),
            actual: cur_state.len(),
        });
    }
    if !action.same_shape(reference_action) {
        return Err(AgentError::ShapeMismatch {
            field: "action",
            expected: reference_action.dim(),
            actual: action.dim(),
        });
    }
    Ok(())
}

/// Columnar view of a trajectory, one `Vec` per field, aligned by step.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTrajectory<I = ()> {
    /// States at which actions were chosen [N]
    pub cur_states: Vec<Observation>,
    /// Actions taken [N]
    pub actions: Vec<Action>,
    /// Behavior log probabilities [N]
    pub log_probs: Vec<f32>,
    /// Value estimates V(s_t) [N]
    pub values: Vec<f32>,
    /// Rewards [N]
    pub rewards: Vec<f32>,
    /// Value estimates of the state reached by each step [N]
    pub next_values: Vec<f32>,
    /// Termination flags [N]
    pub dones: Vec<bool>,
    /// Diagnostic payloads [N]
    pub infos: Vec<I>,
}

impl<I> Default for RawTrajectory<I> {
    fn default() -> Self {
        Self {
            cur_states: Vec::new(),
            actions: Vec::new(),
            log_probs: Vec::new(),
            values: Vec::new(),
            rewards: Vec::new(),
            next_values: Vec::new(),
            dones: Vec::new(),
            infos: Vec::new(),
        }
    }
}

impl<I> RawTrajectory<I> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            cur_states: Vec::with_capacity(capacity),
            actions: Vec::with_capacity(capacity),
            log_probs: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
            rewards: Vec::with_capacity(capacity),
            next_values: Vec::with_capacity(capacity),
            dones: Vec::with_capacity(capacity),
            infos: Vec::with_capacity(capacity),
        }
    }

    /// Number of steps, taken from the `rewards` column.
    pub fn len(&self) -> usize {
        self.rewards.len()
    }

    /// Check if the trajectory has no steps.
    pub fn is_empty(&self) -> bool {
        self.rewards.is_empty()
    }

    fn push(&mut self, t: Transition<I>) {
        self.cur_states.push(t.cur_state);
        self.actions.push(t.action);
        self.log_probs.push(t.log_p);
        self.values.push(t.value);
        self.rewards.push(t.reward);
        self.next_values.push(t.next_value);
        self.dones.push(t.done);
        self.infos.push(t.info);
    }

    /// Check that every column has the same number of steps, N >= 1, and
    /// every step shares the first step's observation width and action shape.
    pub fn validate(&self) -> Result<()> {
        let n = self.len();
        if n == 0 {
            return Err(AgentError::EmptyTrajectory);
        }

        let columns = [
            ("cur_states", self.cur_states.len()),
            ("actions", self.actions.len()),
            ("log_probs", self.log_probs.len()),
            ("values", self.values.len()),
            ("next_values", self.next_values.len()),
            ("dones", self.dones.len()),
            ("infos", self.infos.len()),
        ];
        for (field, len) in columns {
            if len != n {
                return Err(AgentError::LengthMismatch {
                    field,
                    expected: n,
                    actual: len,
                });
            }
        }

        let (first_state, first_action) = (&self.cur_states[0], &self.actions[0]);
        for (state, action) in self.cur_states.iter().zip(&self.actions).skip(1) {
            check_step_shape(first_state, first_action, state, action)?;
        }
        Ok(())
    }
}

/// Growing, ordered sequence of completed transitions.
#[derive(Debug, Clone)]
pub struct TrajectoryAccumulator<I = ()> {
    transitions: Vec<Transition<I>>,
}

impl<I> Default for TrajectoryAccumulator<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> TrajectoryAccumulator<I> {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Append a completed transition.
    ///
    /// The first record fixes the observation dimensionality and action
    /// shape; later records that disagree are rejected and not appended.
    pub fn push(&mut self, transition: Transition<I>) -> Result<()> {
        if let Some(first) = self.transitions.first() {
            check_step_shape(&first.cur_state, &first.action, &transition.cur_state, &transition.action)?;
        }
        self.transitions.push(transition);
        Ok(())
    }

    /// Most recently appended transition.
    pub fn last(&self) -> Option<&Transition<I>> {
        self.transitions.last()
    }

    /// All transitions in temporal order.
    pub fn transitions(&self) -> &[Transition<I>] {
        &self.transitions
    }

    /// Number of transitions.
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    /// Check if no transitions have been appended.
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Discard the partial trajectory.
    pub fn clear(&mut self) {
        self.transitions.clear();
    }

    /// Drain the accumulator into its columnar form.
    ///
    /// Fails with `EmptyTrajectory` (and leaves the accumulator untouched)
    /// when nothing has been appended.
    pub fn finalize(&mut self) -> Result<RawTrajectory<I>> {
        if self.transitions.is_empty() {
            return Err(AgentError::EmptyTrajectory);
        }

        let transitions = std::mem::take(&mut self.transitions);
        let mut raw = RawTrajectory::with_capacity(transitions.len());
        for t in transitions {
            raw.push(t);
        }
        log::trace!("Finalized trajectory of {} steps", raw.len());
        Ok(raw)
    }
}
