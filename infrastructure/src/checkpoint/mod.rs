//! Checkpoint store adapters.

mod file_store;
mod memory_store;

pub use file_store::FileCheckpointStore;
pub use memory_store::MemoryCheckpointStore;
