//! Progress notification port.
//!
//! Defines the interface for reporting progress while a task runs.
//! Implementations live outside the core and can render progress however
//! they like.

use stepwise_domain::{StepId, StepOutcome};

/// Callback for progress updates during task execution.
pub trait ProgressNotifier: Send + Sync {
    /// Called when a step's contract has been issued.
    fn on_step_start(&self, step_id: &StepId, cursor: u64);

    /// Called when a voting round is issued (round is 1-indexed).
    fn on_round(&self, step_id: &StepId, round: usize, k: usize);

    /// Called when a step resolves, successfully or not.
    fn on_step_resolved(&self, outcome: &StepOutcome);

    /// Called when the task's goal predicate holds.
    fn on_task_complete(&self, cursor: u64);
}

/// No-op progress notifier for when progress reporting is not needed.
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_step_start(&self, _step_id: &StepId, _cursor: u64) {}
    fn on_round(&self, _step_id: &StepId, _round: usize, _k: usize) {}
    fn on_step_resolved(&self, _outcome: &StepOutcome) {}
    fn on_task_complete(&self, _cursor: u64) {}
}
