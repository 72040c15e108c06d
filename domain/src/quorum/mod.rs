//! K-voting over validated attempts.
//!
//! The voting coordinator reduces one round's verdicts to a single winning
//! action or a no-consensus report. Quorum is computed against the attempted
//! set size, not the accept count: absent or rejected attempts weaken
//! consensus instead of shrinking the electorate.

pub mod ballot;
pub mod rule;

pub use ballot::{NoConsensusReason, VoteResult, decide};
pub use rule::QuorumRule;
