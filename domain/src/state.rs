//! Atomic task state and the store that owns it.
//!
//! [`StateStore`] is the single source of cross-step memory: one state value
//! plus a monotonic cursor. It is owned exclusively by the orchestration loop
//! and mutated only between steps, so no locking is needed on the hot path.
//! Any "memory" a task needs must be promoted into the state value itself,
//! never kept as implicit conversational history.

use crate::action::ActionValue;
use crate::checkpoint::{Checkpoint, CheckpointError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// A well-formed action that is invalid for the current domain state
/// (e.g. an illegal move). This is a step failure, not a task failure:
/// the escalation controller treats it exactly like a failed vote.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("state transition rejected: {reason}")]
pub struct StateTransitionError {
    /// Why the domain refused the action.
    pub reason: String,
}

impl StateTransitionError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// The domain state of a task.
///
/// Implementations must keep [`apply`](TaskState::apply) a pure function of
/// `(self, action)`: replaying the same action against the same prior state
/// always yields the same result. This is what makes the audit trail
/// replayable and crash recovery sound.
///
/// State size must be bounded by the task domain, not by history length —
/// never grow it by appending past interactions.
pub trait TaskState: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Compute the successor state, or reject a domain-invalid action.
    fn apply(&self, action: &ActionValue) -> Result<Self, StateTransitionError>;
}

/// Exclusive owner of a task's atomic state and step cursor.
#[derive(Debug, Clone)]
pub struct StateStore<S: TaskState> {
    state: S,
    cursor: u64,
}

impl<S: TaskState> StateStore<S> {
    /// Start a fresh task at cursor 0.
    pub fn new(initial: S) -> Self {
        Self {
            state: initial,
            cursor: 0,
        }
    }

    /// Rebuild the store from a checkpoint (the sole recovery unit).
    pub fn restore(checkpoint: Checkpoint<S>) -> Result<Self, CheckpointError> {
        checkpoint.validate()?;
        Ok(Self {
            state: checkpoint.state,
            cursor: checkpoint.cursor,
        })
    }

    /// The current state value.
    pub fn current(&self) -> &S {
        &self.state
    }

    /// Number of steps applied so far; also the index of the next step.
    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    /// Apply a winning action, advancing the cursor on success.
    ///
    /// On `StateTransitionError` the stored state is left untouched.
    pub fn apply(&mut self, action: &ActionValue) -> Result<&S, StateTransitionError> {
        let next = self.state.apply(action)?;
        self.state = next;
        self.cursor += 1;
        Ok(&self.state)
    }

    /// Snapshot the current (state, cursor) pair.
    pub fn checkpoint(&self) -> Checkpoint<S> {
        Checkpoint::new(self.cursor, self.state.clone())
    }
}
