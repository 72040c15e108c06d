//! Task decomposition.

use crate::state::TaskState;
use crate::step::StepContract;

/// What the decomposer produced for the current state.
#[derive(Debug, Clone, PartialEq)]
pub enum NextStep {
    /// One atomic step to attempt next.
    Step(StepContract),
    /// The task's goal predicate holds; nothing left to do.
    Complete,
}

/// Produces the next atomic step for a task.
///
/// A step must be deliberately minimal in scope: "propose the single next
/// move", not "solve the rest of the puzzle". Implementations are stateless
/// across calls beyond reading the state value — any memory they need must
/// live in the state itself, never in recollection of prior oracle
/// exchanges.
pub trait Decomposer<S: TaskState>: Send + Sync {
    /// Produce the next step's contract, or signal completion.
    fn next(&self, state: &S, cursor: u64) -> NextStep;
}
