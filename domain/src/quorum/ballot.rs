//! Vote tallying and consensus decision.

use super::rule::QuorumRule;
use crate::action::ActionValue;
use crate::validation::ValidationVerdict;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Why a round produced no consensus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum NoConsensusReason {
    /// Every attempt was rejected or absent.
    NoAccepts,
    /// The top tally did not meet the quorum rule.
    BelowQuorum { top: usize, needed: usize },
    /// Two or more actions tied for the plurality. Ties never resolve by
    /// attempt order, so the result stays order-independent.
    Tie { support: usize },
}

impl std::fmt::Display for NoConsensusReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoConsensusReason::NoAccepts => write!(f, "no accepted attempts"),
            NoConsensusReason::BelowQuorum { top, needed } => {
                write!(f, "top tally {top} below quorum {needed}")
            }
            NoConsensusReason::Tie { support } => {
                write!(f, "plurality tie at {support} votes")
            }
        }
    }
}

/// Outcome of one voting round.
#[derive(Debug, Clone, PartialEq)]
pub enum VoteResult {
    /// One canonical action won with strict plurality and quorum support.
    Win { action: ActionValue, support: usize },
    /// No single action may be trusted this round.
    NoConsensus { reason: NoConsensusReason },
}

impl VoteResult {
    pub fn is_win(&self) -> bool {
        matches!(self, VoteResult::Win { .. })
    }

    pub fn support(&self) -> usize {
        match self {
            VoteResult::Win { support, .. } => *support,
            VoteResult::NoConsensus { .. } => 0,
        }
    }
}

/// Reduce one round's verdicts to a single winning action, or report
/// no-consensus.
///
/// `attempted` is the number of attempts issued for the round (`k`), which
/// may exceed `verdicts.len()` when invocations timed out. A win requires
/// the top tally to satisfy `rule` against `attempted` AND strictly exceed
/// every other tally.
pub fn decide(verdicts: &[ValidationVerdict], attempted: usize, rule: &QuorumRule) -> VoteResult {
    // BTreeMap keyed by canonical form: deterministic iteration, so the
    // decision is reproducible for identical verdict multisets.
    let mut tallies: BTreeMap<String, (ActionValue, usize)> = BTreeMap::new();
    for verdict in verdicts {
        if let ValidationVerdict::Accept(action) = verdict {
            tallies
                .entry(action.canonical())
                .and_modify(|(_, count)| *count += 1)
                .or_insert_with(|| (action.clone(), 1));
        }
    }

    let Some((top_action, top_support)) = tallies
        .values()
        .max_by_key(|(_, count)| *count)
        .map(|(action, count)| (action.clone(), *count))
    else {
        return VoteResult::NoConsensus {
            reason: NoConsensusReason::NoAccepts,
        };
    };

    let runner_up = tallies
        .values()
        .map(|(_, count)| *count)
        .filter(|count| *count < top_support)
        .max()
        .unwrap_or(0);
    let tied = tallies
        .values()
        .filter(|(_, count)| *count == top_support)
        .count();

    if tied > 1 {
        return VoteResult::NoConsensus {
            reason: NoConsensusReason::Tie {
                support: top_support,
            },
        };
    }

    if !rule.is_met(top_support, attempted) {
        return VoteResult::NoConsensus {
            reason: NoConsensusReason::BelowQuorum {
                top: top_support,
                needed: rule.min_support(attempted),
            },
        };
    }

    debug_assert!(top_support > runner_up);
    VoteResult::Win {
        action: top_action,
        support: top_support,
    }
}
