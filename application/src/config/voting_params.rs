//! Voting parameters.

use serde::{Deserialize, Serialize};
use stepwise_domain::QuorumRule;

/// Controls how a round's verdicts are reduced to a decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct VotingParams {
    /// Quorum rule applied against the attempted set size.
    pub rule: QuorumRule,
}

impl VotingParams {
    pub fn with_rule(mut self, rule: QuorumRule) -> Self {
        self.rule = rule;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_majority() {
        assert_eq!(VotingParams::default().rule, QuorumRule::Majority);
    }
}
