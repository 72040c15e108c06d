//! Infrastructure layer for stepwise
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: checkpoint persistence, outcome logging, tracing
//! setup, configuration file loading, and a simulated oracle for
//! exercising reliability properties without a live model.

pub mod checkpoint;
pub mod config;
pub mod logging;
pub mod oracle;

// Re-export commonly used types
pub use checkpoint::{FileCheckpointStore, MemoryCheckpointStore};
pub use config::{ConfigLoader, FileConfig};
pub use logging::{JsonlOutcomeLog, init_tracing};
pub use oracle::{SimulatedOracle, unreliable};
