//! Application layer for stepwise
//!
//! This crate contains use cases, port definitions, and application
//! configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{AttemptParams, EngineConfig, ExecutionParams, VotingParams};
pub use ports::{
    checkpoint_store::{CheckpointStore, CheckpointStoreError},
    oracle::{Oracle, OracleError},
    outcome_log::{NoOutcomeLog, OutcomeLog},
    progress::{NoProgress, ProgressNotifier},
};
pub use use_cases::run_attempts::AttemptExecutor;
pub use use_cases::run_task::{FatalTaskError, RunTaskError, RunTaskUseCase, TaskReport};
