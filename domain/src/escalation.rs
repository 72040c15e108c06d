//! Per-step escalation state machine.
//!
//! This is the system's failure-containment core. Every step runs its own
//! controller through `Init -> AwaitVotes -> { Applied, Retry, Escalate,
//! Aborted }`: failed rounds grow `k` geometrically up to a ceiling, a
//! bounded escalation phase runs at the ceiling, and exhaustion aborts the
//! step. Retry is cheap and never propagates unvalidated state forward.

use crate::action::ActionValue;
use crate::quorum::VoteResult;
use serde::{Deserialize, Serialize};

/// Phase of a step's escalation state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepPhase {
    /// No round armed yet.
    Init,
    /// A voting round is in flight.
    AwaitVotes,
    /// A winning action was applied; the step is resolved.
    Applied,
    /// The last round failed; the same contract will be reissued.
    Retry,
    /// Retry budget exhausted; running widened rounds at the k ceiling.
    Escalate,
    /// Escalation exhausted; the step (and task) is aborted.
    Aborted,
}

impl std::fmt::Display for StepPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StepPhase::Init => "init",
            StepPhase::AwaitVotes => "await_votes",
            StepPhase::Applied => "applied",
            StepPhase::Retry => "retry",
            StepPhase::Escalate => "escalate",
            StepPhase::Aborted => "aborted",
        };
        write!(f, "{name}")
    }
}

/// Retry and k-growth policy.
///
/// Quorum thresholds and the growth schedule are configuration, not
/// constants: different tasks warrant different attempt budgets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationPolicy {
    /// Attempts per round before any failure.
    pub initial_k: usize,
    /// Multiplier applied to k after each failed round (1 = reissue with
    /// the same k).
    pub growth_factor: usize,
    /// Ceiling for k.
    pub max_k: usize,
    /// Failed rounds tolerated before escalating.
    pub max_retries: usize,
    /// Additional rounds at `max_k` before aborting.
    pub escalation_rounds: usize,
}

impl Default for EscalationPolicy {
    fn default() -> Self {
        Self {
            initial_k: 3,
            growth_factor: 2,
            max_k: 9,
            max_retries: 4,
            escalation_rounds: 2,
        }
    }
}

impl EscalationPolicy {
    pub fn with_initial_k(mut self, k: usize) -> Self {
        self.initial_k = k;
        self
    }

    pub fn with_growth_factor(mut self, factor: usize) -> Self {
        self.growth_factor = factor;
        self
    }

    pub fn with_max_k(mut self, max_k: usize) -> Self {
        self.max_k = max_k;
        self
    }

    pub fn with_max_retries(mut self, retries: usize) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn with_escalation_rounds(mut self, rounds: usize) -> Self {
        self.escalation_rounds = rounds;
        self
    }

    /// Upper bound on voting rounds for one step.
    pub fn max_rounds(&self) -> usize {
        1 + self.max_retries + self.escalation_rounds
    }
}

/// What the orchestration loop must do next with a step.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// Apply this winning action to state.
    Apply(ActionValue),
    /// Reissue the same contract with `k` attempts.
    Retry { k: usize },
    /// Budget exhausted; fail the step.
    Abort,
}

/// State machine instance for one step.
///
/// Pure: the controller never performs I/O, so retry budgets and
/// termination are testable in isolation.
#[derive(Debug)]
pub struct EscalationController {
    policy: EscalationPolicy,
    phase: StepPhase,
    k: usize,
    failures: usize,
}

impl EscalationController {
    pub fn new(policy: EscalationPolicy) -> Self {
        let k = policy.initial_k.max(1);
        Self {
            policy,
            phase: StepPhase::Init,
            k,
            failures: 0,
        }
    }

    pub fn phase(&self) -> StepPhase {
        self.phase
    }

    /// Attempts to issue for the current round.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Failed rounds so far (retries consumed).
    pub fn retries(&self) -> usize {
        self.failures
    }

    /// Arm the next voting round and return its k.
    pub fn begin_round(&mut self) -> usize {
        self.phase = StepPhase::AwaitVotes;
        self.k
    }

    /// Feed the round's vote result.
    pub fn on_vote(&mut self, result: &VoteResult) -> Directive {
        match result {
            VoteResult::Win { action, .. } => {
                self.phase = StepPhase::Applied;
                Directive::Apply(action.clone())
            }
            VoteResult::NoConsensus { .. } => self.record_failure(),
        }
    }

    /// A winning action the domain refused is treated identically to a
    /// failed vote: the consensus proved domain-invalid.
    pub fn on_apply_rejected(&mut self) -> Directive {
        self.record_failure()
    }

    fn record_failure(&mut self) -> Directive {
        self.failures += 1;
        if self.failures <= self.policy.max_retries {
            self.phase = StepPhase::Retry;
            let grown = self.k.saturating_mul(self.policy.growth_factor.max(1));
            self.k = grown.clamp(1, self.policy.max_k.max(1));
            Directive::Retry { k: self.k }
        } else if self.failures <= self.policy.max_retries + self.policy.escalation_rounds {
            self.phase = StepPhase::Escalate;
            self.k = self.policy.max_k.max(1);
            Directive::Retry { k: self.k }
        } else {
            self.phase = StepPhase::Aborted;
            Directive::Abort
        }
    }
}
