//! Checkpoints — the sole recovery unit.
//!
//! A checkpoint is a versioned `(state, cursor)` snapshot written after every
//! successfully applied step. No in-flight step state ever needs to survive a
//! crash: steps are atomic and only applied state is durable.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Current checkpoint envelope version. Bump when the envelope layout (not
/// the task-specific state schema) changes.
pub const CHECKPOINT_VERSION: u32 = 1;

/// Errors raised when a checkpoint cannot be accepted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckpointError {
    #[error("unsupported checkpoint version {found} (supported: {supported})")]
    VersionMismatch { found: u32, supported: u32 },
}

/// A `(state, cursor)` snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint<S> {
    /// Envelope version, for schema evolution across task types.
    pub version: u32,
    /// Cursor of the next step to execute.
    pub cursor: u64,
    /// The atomic task state at that cursor.
    pub state: S,
}

impl<S> Checkpoint<S> {
    /// Snapshot at the current envelope version.
    pub fn new(cursor: u64, state: S) -> Self {
        Self {
            version: CHECKPOINT_VERSION,
            cursor,
            state,
        }
    }

    /// Reject checkpoints written by an incompatible envelope version.
    pub fn validate(&self) -> Result<(), CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::VersionMismatch {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            });
        }
        Ok(())
    }
}
