//! In-memory checkpoint store.
//!
//! Keeps the latest checkpoint in a mutex-guarded slot. Useful for tests
//! and for long runs where durability is handled elsewhere; a million-step
//! task does not want a million file writes.

use std::sync::Mutex;
use stepwise_application::{CheckpointStore, CheckpointStoreError};
use stepwise_domain::{Checkpoint, TaskState};

/// Single-slot checkpoint store with no durability.
pub struct MemoryCheckpointStore<S: TaskState> {
    slot: Mutex<Option<Checkpoint<S>>>,
}

impl<S: TaskState> MemoryCheckpointStore<S> {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Cursor of the stored checkpoint, if any.
    pub fn cursor(&self) -> Option<u64> {
        self.slot
            .lock()
            .ok()
            .and_then(|slot| slot.as_ref().map(|c| c.cursor))
    }
}

impl<S: TaskState> Default for MemoryCheckpointStore<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: TaskState> CheckpointStore<S> for MemoryCheckpointStore<S> {
    fn save(&self, checkpoint: &Checkpoint<S>) -> Result<(), CheckpointStoreError> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| CheckpointStoreError::Corrupt("checkpoint slot poisoned".to_string()))?;
        *slot = Some(checkpoint.clone());
        Ok(())
    }

    fn load(&self) -> Result<Option<Checkpoint<S>>, CheckpointStoreError> {
        let slot = self
            .slot
            .lock()
            .map_err(|_| CheckpointStoreError::Corrupt("checkpoint slot poisoned".to_string()))?;
        Ok(slot.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use stepwise_domain::{ActionValue, StateTransitionError};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Unit;

    impl TaskState for Unit {
        fn apply(&self, _action: &ActionValue) -> Result<Self, StateTransitionError> {
            Ok(Unit)
        }
    }

    #[test]
    fn test_empty_store_loads_none() {
        let store: MemoryCheckpointStore<Unit> = MemoryCheckpointStore::new();
        assert!(store.load().unwrap().is_none());
        assert!(store.cursor().is_none());
    }

    #[test]
    fn test_save_overwrites() {
        let store = MemoryCheckpointStore::new();
        store.save(&Checkpoint::new(1, Unit)).unwrap();
        store.save(&Checkpoint::new(7, Unit)).unwrap();
        assert_eq!(store.cursor(), Some(7));
        assert_eq!(store.load().unwrap().unwrap().cursor, 7);
    }
}
