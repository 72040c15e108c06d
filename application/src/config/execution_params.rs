//! Execution parameters — orchestration loop control.

use serde::{Deserialize, Serialize};
use stepwise_domain::AuditTrail;

/// Loop-level guards for [`RunTaskUseCase`](crate::use_cases::run_task::RunTaskUseCase).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionParams {
    /// Abort if this many steps are applied without the decomposer
    /// signalling completion (guards against a task that never converges).
    pub max_steps: Option<u64>,
    /// In-memory audit trail capacity (outcome records, oldest evicted).
    pub audit_capacity: usize,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            max_steps: None,
            audit_capacity: AuditTrail::DEFAULT_CAPACITY,
        }
    }
}

impl ExecutionParams {
    pub fn with_max_steps(mut self, max: Option<u64>) -> Self {
        self.max_steps = max;
        self
    }

    pub fn with_audit_capacity(mut self, capacity: usize) -> Self {
        self.audit_capacity = capacity;
        self
    }
}
