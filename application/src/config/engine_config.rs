//! Engine configuration container.
//!
//! [`EngineConfig`] groups the split configuration types into a single
//! container that callers hold when wiring a task run. Use cases receive
//! only the slices they need.

use crate::config::{AttemptParams, ExecutionParams, VotingParams};
use serde::{Deserialize, Serialize};
use stepwise_domain::{EscalationPolicy, QuorumRule};

/// Configuration for one task engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    /// Voting decision parameters.
    pub voting: VotingParams,
    /// Retry and k-growth policy (domain type).
    pub escalation: EscalationPolicy,
    /// Fan-out and timeout parameters.
    pub attempts: AttemptParams,
    /// Loop-level guards.
    pub execution: ExecutionParams,
}

impl EngineConfig {
    // ==================== Builder Methods ====================

    pub fn with_rule(mut self, rule: QuorumRule) -> Self {
        self.voting = self.voting.with_rule(rule);
        self
    }

    pub fn with_escalation(mut self, escalation: EscalationPolicy) -> Self {
        self.escalation = escalation;
        self
    }

    pub fn with_attempts(mut self, attempts: AttemptParams) -> Self {
        self.attempts = attempts;
        self
    }

    pub fn with_execution(mut self, execution: ExecutionParams) -> Self {
        self.execution = execution;
        self
    }
}
