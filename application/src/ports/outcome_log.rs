//! Port for the persisted audit trail.
//!
//! Defines the [`OutcomeLog`] trait for appending [`StepOutcome`] records to
//! an append-only log, intended for post-hoc diagnosis.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures outcome
//! records in a machine-readable format. Raw attempt text is deliberately
//! excluded so storage stays bounded.

use stepwise_domain::StepOutcome;

/// Append-only log of step outcomes.
///
/// The `append` method is intentionally synchronous and non-fallible to
/// avoid disrupting the orchestration loop — logging failures are silently
/// ignored.
pub trait OutcomeLog: Send + Sync {
    /// Record one step's terminal outcome.
    fn append(&self, outcome: &StepOutcome);
}

/// No-op implementation for tests and when audit logging is disabled.
pub struct NoOutcomeLog;

impl OutcomeLog for NoOutcomeLog {
    fn append(&self, _outcome: &StepOutcome) {}
}
