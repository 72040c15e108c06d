//! Port definitions (interfaces to external collaborators).
//!
//! Implementations (adapters) live in the infrastructure layer.

pub mod checkpoint_store;
pub mod oracle;
pub mod outcome_log;
pub mod progress;
