//! Oracle invocation port.
//!
//! The oracle is the unreliable step-generating collaborator (typically an
//! LLM call). The whole architecture assumes nothing about it beyond this
//! boundary: no statefulness between calls, bounded single-call accuracy,
//! and arbitrary failure modes.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur at the oracle transport boundary.
///
/// Transport failures are retried by the attempt executor within its own
/// short-lived budget, independent of step-level escalation.
#[derive(Error, Debug, Clone)]
pub enum OracleError {
    #[error("connection error: {0}")]
    ConnectionError(String),

    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("oracle unavailable: {0}")]
    Unavailable(String),
}

impl OracleError {
    /// Whether a fresh invocation might succeed.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            OracleError::ConnectionError(_) | OracleError::RequestFailed(_)
        )
    }
}

/// Single-shot oracle invocation.
///
/// Implementations must treat every call as independent: the prompt and
/// schema hint are the only inputs, and nothing about a call may leak into
/// the next one. Timeouts are enforced by the caller, not the adapter.
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Ask the oracle for one raw response.
    async fn invoke(&self, prompt: &str, schema_hint: &str) -> Result<String, OracleError>;
}
