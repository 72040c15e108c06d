//! Step contracts, output schemas and attempts.
//!
//! A step is one atomic unit of work: the decomposer issues an immutable
//! [`StepContract`], the attempt executor gathers raw [`Attempt`]s for it,
//! and everything about the step is discarded once it resolves.

pub mod attempt;
pub mod contract;
pub mod schema;

pub use attempt::Attempt;
pub use contract::{StepContract, StepId};
pub use schema::{FieldType, OutputSchema};
