//! Checkpoint storage port.

use stepwise_domain::{Checkpoint, CheckpointError, TaskState};
use thiserror::Error;

/// Errors from checkpoint storage.
///
/// Unlike every other failure in the system, a checkpoint write error is
/// fatal: continuing past a failed write would break the crash-recovery
/// invariant that applied state is always durable.
#[derive(Error, Debug)]
pub enum CheckpointStoreError {
    #[error("checkpoint I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("checkpoint corrupt: {0}")]
    Corrupt(String),

    #[error(transparent)]
    Version(#[from] CheckpointError),
}

/// Durable storage for the latest checkpoint.
///
/// `save` is called after every applied step and must complete before the
/// next step's decomposer call; writes are serialized by the orchestration
/// loop, so implementations never see concurrent saves.
pub trait CheckpointStore<S: TaskState>: Send + Sync {
    /// Persist a checkpoint, replacing any previous one.
    fn save(&self, checkpoint: &Checkpoint<S>) -> Result<(), CheckpointStoreError>;

    /// Load the latest checkpoint, if any was ever written.
    fn load(&self) -> Result<Option<Checkpoint<S>>, CheckpointStoreError>;
}
