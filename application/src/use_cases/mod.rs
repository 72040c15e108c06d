//! Use cases.

pub mod run_attempts;
pub mod run_task;
