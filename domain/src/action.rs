//! Canonical action values.
//!
//! An [`ActionValue`] is the parsed, canonicalized payload extracted from an
//! accepted oracle attempt. Canonicalization makes actions comparable by
//! value across attempts, which is what quorum tallying relies on.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A validated, canonicalized action.
///
/// Wraps a `serde_json::Value`. Object keys are stored sorted (serde_json's
/// default map representation), so two semantically identical actions render
/// to the same canonical string regardless of the field order the oracle
/// happened to emit them in.
///
/// # Example
///
/// ```
/// use stepwise_domain::ActionValue;
///
/// let a = ActionValue::new(serde_json::json!({"op": "toggle", "cell": 3}));
/// let b = ActionValue::new(serde_json::json!({"cell": 3, "op": "toggle"}));
/// assert_eq!(a.canonical(), b.canonical());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionValue(Value);

impl ActionValue {
    /// Wrap an already-parsed JSON value.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// The underlying JSON value.
    pub fn as_json(&self) -> &Value {
        &self.0
    }

    /// Canonical string form, used as the tally key during voting.
    pub fn canonical(&self) -> String {
        self.0.to_string()
    }

    /// Convenience accessor for a top-level field.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }
}

impl std::fmt::Display for ActionValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
