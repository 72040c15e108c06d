//! Domain layer for stepwise
//!
//! This crate contains the core business logic for long-horizon stepwise
//! execution. It has no dependencies on infrastructure concerns.
//!
//! # Core Concepts
//!
//! ## Step quorum
//!
//! Each step of a task is attempted by `k` independent oracle invocations.
//! Attempts are validated fail-closed against the step's output schema and
//! the surviving actions are tallied; only an action with strict-quorum
//! support is ever applied to state.
//!
//! ## Bounded memory
//!
//! The only cross-step memory is [`StateStore`]: a single atomic state value
//! plus a monotonic cursor. Nothing from a resolved step survives except a
//! compact [`StepOutcome`] record.

pub mod action;
pub mod audit;
pub mod checkpoint;
pub mod decompose;
pub mod escalation;
pub mod quorum;
pub mod state;
pub mod step;
pub mod validation;

// Re-export commonly used types
pub use action::ActionValue;
pub use audit::{AuditTrail, StepOutcome, StepStatus};
pub use checkpoint::{CHECKPOINT_VERSION, Checkpoint, CheckpointError};
pub use decompose::{Decomposer, NextStep};
pub use escalation::{Directive, EscalationController, EscalationPolicy, StepPhase};
pub use quorum::{NoConsensusReason, QuorumRule, VoteResult, decide};
pub use state::{StateStore, StateTransitionError, TaskState};
pub use step::{Attempt, FieldType, OutputSchema, StepContract, StepId};
pub use validation::{RejectReason, ValidationVerdict, check};
