//! Raw TOML configuration data types.
//!
//! These structs represent the exact structure of the TOML config file and
//! are deserialized directly. [`FileConfig::into_engine_config`] converts
//! them into the typed engine configuration.
//!
//! Example configuration:
//!
//! ```toml
//! [voting]
//! rule = "majority"
//!
//! [escalation]
//! initial_k = 3
//! growth_factor = 2
//! max_k = 9
//! max_retries = 4
//! escalation_rounds = 2
//!
//! [attempts]
//! attempt_timeout_ms = 30000
//! transport_retries = 1
//!
//! [checkpoint]
//! path = "task.checkpoint.json"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use stepwise_application::{AttemptParams, EngineConfig, ExecutionParams};
use stepwise_domain::{AuditTrail, EscalationPolicy, QuorumRule};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Consensus settings
    pub voting: FileVotingConfig,
    /// Retry and k-growth settings
    pub escalation: FileEscalationConfig,
    /// Fan-out and timeout settings
    pub attempts: FileAttemptsConfig,
    /// Orchestration loop guards
    pub execution: FileExecutionConfig,
    /// Checkpoint persistence settings
    pub checkpoint: FileCheckpointConfig,
    /// Logging settings
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Convert the raw file structure into the typed engine configuration.
    pub fn into_engine_config(self) -> EngineConfig {
        EngineConfig::default()
            .with_rule(self.voting.parse_rule())
            .with_escalation(self.escalation.into_policy())
            .with_attempts(self.attempts.into_params())
            .with_execution(self.execution.into_params())
    }
}

/// Voting configuration from TOML (`[voting]` section)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileVotingConfig {
    /// Consensus rule: "majority", "unanimous", "atleast:N", "N%"
    pub rule: String,
}

impl Default for FileVotingConfig {
    fn default() -> Self {
        Self {
            rule: "majority".to_string(),
        }
    }
}

impl FileVotingConfig {
    /// Parse the rule string, falling back to the default rule.
    pub fn parse_rule(&self) -> QuorumRule {
        self.rule.parse().unwrap_or_default()
    }
}

/// Escalation configuration from TOML (`[escalation]` section)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEscalationConfig {
    pub initial_k: usize,
    pub growth_factor: usize,
    pub max_k: usize,
    pub max_retries: usize,
    pub escalation_rounds: usize,
}

impl Default for FileEscalationConfig {
    fn default() -> Self {
        let policy = EscalationPolicy::default();
        Self {
            initial_k: policy.initial_k,
            growth_factor: policy.growth_factor,
            max_k: policy.max_k,
            max_retries: policy.max_retries,
            escalation_rounds: policy.escalation_rounds,
        }
    }
}

impl FileEscalationConfig {
    pub fn into_policy(self) -> EscalationPolicy {
        EscalationPolicy {
            initial_k: self.initial_k,
            growth_factor: self.growth_factor,
            max_k: self.max_k,
            max_retries: self.max_retries,
            escalation_rounds: self.escalation_rounds,
        }
    }
}

/// Attempt execution configuration from TOML (`[attempts]` section)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAttemptsConfig {
    /// Per-invocation timeout in milliseconds
    pub attempt_timeout_ms: u64,
    /// Optional round join-barrier deadline in milliseconds
    pub round_timeout_ms: Option<u64>,
    /// Transport-error retries per attempt slot
    pub transport_retries: usize,
}

impl Default for FileAttemptsConfig {
    fn default() -> Self {
        let params = AttemptParams::default();
        Self {
            attempt_timeout_ms: params.attempt_timeout.as_millis() as u64,
            round_timeout_ms: None,
            transport_retries: params.transport_retries,
        }
    }
}

impl FileAttemptsConfig {
    pub fn into_params(self) -> AttemptParams {
        AttemptParams::default()
            .with_attempt_timeout(Duration::from_millis(self.attempt_timeout_ms))
            .with_round_timeout(self.round_timeout_ms.map(Duration::from_millis))
            .with_transport_retries(self.transport_retries)
    }
}

/// Execution configuration from TOML (`[execution]` section)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExecutionConfig {
    /// Abort after this many applied steps without completion
    pub max_steps: Option<u64>,
    /// In-memory audit trail capacity
    pub audit_capacity: usize,
}

impl Default for FileExecutionConfig {
    fn default() -> Self {
        Self {
            max_steps: None,
            audit_capacity: AuditTrail::DEFAULT_CAPACITY,
        }
    }
}

impl FileExecutionConfig {
    pub fn into_params(self) -> ExecutionParams {
        ExecutionParams::default()
            .with_max_steps(self.max_steps)
            .with_audit_capacity(self.audit_capacity)
    }
}

/// Checkpoint configuration from TOML (`[checkpoint]` section)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCheckpointConfig {
    /// Checkpoint file path; `None` means the caller picks a store.
    pub path: Option<String>,
}

impl FileCheckpointConfig {
    pub fn checkpoint_path(&self) -> Option<PathBuf> {
        self.path.as_ref().map(PathBuf::from)
    }
}

/// Logging configuration from TOML (`[logging]` section)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Default tracing filter (overridden by `RUST_LOG`)
    pub filter: String,
    /// JSONL outcome log path; `None` disables the durable audit log.
    pub outcome_log: Option<String>,
}

impl Default for FileLoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            outcome_log: None,
        }
    }
}

impl FileLoggingConfig {
    pub fn outcome_log_path(&self) -> Option<PathBuf> {
        self.outcome_log.as_ref().map(PathBuf::from)
    }
}
