//! Configuration file loading.

mod file_config;
mod loader;

pub use file_config::{
    FileAttemptsConfig, FileCheckpointConfig, FileConfig, FileEscalationConfig,
    FileExecutionConfig, FileLoggingConfig, FileVotingConfig,
};
pub use loader::ConfigLoader;
