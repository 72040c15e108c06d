//! Application configuration.
//!
//! Configuration is split by concern: voting, escalation (a domain policy),
//! attempt execution, and loop control. [`EngineConfig`] groups the split
//! types for wiring.

pub mod attempt_params;
pub mod engine_config;
pub mod execution_params;
pub mod voting_params;

pub use attempt_params::AttemptParams;
pub use engine_config::EngineConfig;
pub use execution_params::ExecutionParams;
pub use voting_params::VotingParams;
