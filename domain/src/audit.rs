//! Step outcomes and the bounded audit trail.
//!
//! Only outcomes are retained long-term, never raw attempt text: the audit
//! trail must stay bounded, and it must not become a back-channel for the
//! drift-inducing history the architecture deliberately withholds from the
//! oracle.

use crate::action::ActionValue;
use crate::step::StepId;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Terminal status of a resolved step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepStatus {
    /// The winning action was applied to state.
    Applied {
        action: ActionValue,
        /// Vote support the winner carried.
        support: usize,
    },
    /// The step failed terminally.
    Failed { reason: String },
}

/// Compact terminal record for one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub step_id: StepId,
    pub cursor: u64,
    #[serde(flatten)]
    pub status: StepStatus,
    /// Retry rounds consumed before resolution.
    pub retries: usize,
    /// Milliseconds since epoch.
    pub timestamp: u64,
}

impl StepOutcome {
    pub fn applied(
        step_id: StepId,
        cursor: u64,
        action: ActionValue,
        support: usize,
        retries: usize,
    ) -> Self {
        Self {
            step_id,
            cursor,
            status: StepStatus::Applied { action, support },
            retries,
            timestamp: current_timestamp(),
        }
    }

    pub fn failed(step_id: StepId, cursor: u64, reason: impl Into<String>, retries: usize) -> Self {
        Self {
            step_id,
            cursor,
            status: StepStatus::Failed {
                reason: reason.into(),
            },
            retries,
            timestamp: current_timestamp(),
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self.status, StepStatus::Applied { .. })
    }
}

/// Get current timestamp in milliseconds
fn current_timestamp() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Append-only, bounded ring of step outcomes.
///
/// Older outcomes are evicted once `capacity` is reached, keeping memory
/// bounded over million-step tasks. Durable audit belongs to the outcome
/// log port, not this buffer.
#[derive(Debug, Clone)]
pub struct AuditTrail {
    capacity: usize,
    outcomes: VecDeque<StepOutcome>,
    total_retries: usize,
}

impl AuditTrail {
    pub const DEFAULT_CAPACITY: usize = 1024;

    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            outcomes: VecDeque::new(),
            total_retries: 0,
        }
    }

    pub fn push(&mut self, outcome: StepOutcome) {
        self.total_retries += outcome.retries;
        if self.outcomes.len() == self.capacity {
            self.outcomes.pop_front();
        }
        self.outcomes.push_back(outcome);
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn last(&self) -> Option<&StepOutcome> {
        self.outcomes.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StepOutcome> {
        self.outcomes.iter()
    }

    /// Sum of retries across all recorded outcomes, including evicted ones.
    pub fn total_retries(&self) -> usize {
        self.total_retries
    }
}

impl Default for AuditTrail {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
