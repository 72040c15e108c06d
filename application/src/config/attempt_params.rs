//! Attempt execution parameters.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Controls the per-round fan-out of oracle invocations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptParams {
    /// Independent timeout for each oracle invocation. A timed-out
    /// invocation contributes no attempt (absence, not rejection).
    pub attempt_timeout: Duration,
    /// Optional deadline for the whole round's join barrier; outstanding
    /// invocations are cancelled when it elapses.
    pub round_timeout: Option<Duration>,
    /// Transport-error retries per attempt slot, independent of step-level
    /// escalation retries.
    pub transport_retries: usize,
}

impl Default for AttemptParams {
    fn default() -> Self {
        Self {
            attempt_timeout: Duration::from_secs(30),
            round_timeout: None,
            transport_retries: 1,
        }
    }
}

impl AttemptParams {
    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    pub fn with_round_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.round_timeout = timeout;
        self
    }

    pub fn with_transport_retries(mut self, retries: usize) -> Self {
        self.transport_retries = retries;
        self
    }
}
