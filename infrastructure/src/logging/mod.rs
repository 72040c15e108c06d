//! Logging adapters: durable outcome records and tracing setup.

mod jsonl_outcome_log;
mod subscriber;

pub use jsonl_outcome_log::JsonlOutcomeLog;
pub use subscriber::init_tracing;
