//! Raw oracle attempts.

use std::time::Duration;

/// One oracle invocation's raw output for a step contract.
///
/// Attempts for the same step are causally independent: none may observe
/// another's output. A timed-out invocation produces no `Attempt` at all —
/// absence, not rejection. Attempts are discarded once the step resolves;
/// only the compact step outcome is retained.
#[derive(Debug, Clone)]
pub struct Attempt {
    /// Attempt slot index within the round (`0..k`).
    pub index: usize,
    /// Raw oracle output, unparsed.
    pub raw: String,
    /// Wall-clock duration of the invocation.
    pub duration: Duration,
}

impl Attempt {
    pub fn new(index: usize, raw: impl Into<String>, duration: Duration) -> Self {
        Self {
            index,
            raw: raw.into(),
            duration,
        }
    }
}
