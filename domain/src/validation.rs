//! Red-flag validation of raw attempts.
//!
//! A syntax violation is treated as a proxy signal for an undetected logic
//! error, so the policy is fail-closed: the output must match the exact
//! expected shape or it is rejected outright. No best-effort repair, no
//! stripping of surrounding prose or markdown fences, no partial acceptance.

use crate::action::ActionValue;
use crate::step::{Attempt, FieldType, OutputSchema};
use serde::{Deserialize, Serialize};

/// Why an attempt was rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum RejectReason {
    /// Output is not a single well-formed JSON document (covers truncation
    /// and trailing extra content).
    Unparsable { detail: String },
    /// Output exceeds the schema's byte bound.
    LengthExceeded { len: usize, max: usize },
    /// Output parsed but is not a JSON object.
    NotAnObject,
    /// A declared field is absent.
    MissingField { field: String },
    /// A field outside the declared set is present.
    UnexpectedField { field: String },
    /// A declared field has the wrong JSON type.
    WrongType { field: String, expected: FieldType },
}

impl RejectReason {
    /// Short reason code for diagnostics.
    pub fn code(&self) -> &'static str {
        match self {
            RejectReason::Unparsable { .. } => "unparsable",
            RejectReason::LengthExceeded { .. } => "length_exceeded",
            RejectReason::NotAnObject => "not_an_object",
            RejectReason::MissingField { .. } => "missing_field",
            RejectReason::UnexpectedField { .. } => "unexpected_field",
            RejectReason::WrongType { .. } => "wrong_type",
        }
    }
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::Unparsable { detail } => write!(f, "unparsable output: {detail}"),
            RejectReason::LengthExceeded { len, max } => {
                write!(f, "output length {len} exceeds bound {max}")
            }
            RejectReason::NotAnObject => write!(f, "output is not a JSON object"),
            RejectReason::MissingField { field } => write!(f, "missing field {field:?}"),
            RejectReason::UnexpectedField { field } => write!(f, "unexpected field {field:?}"),
            RejectReason::WrongType { field, expected } => {
                write!(f, "field {field:?}: expected {expected}")
            }
        }
    }
}

/// Verdict for one attempt against a step's output contract.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationVerdict {
    /// Parsed and canonicalized action, ready for tallying.
    Accept(ActionValue),
    /// Rejected with a reason code. Rejects are consumed by voting, never
    /// surfaced to the caller directly.
    Reject(RejectReason),
}

impl ValidationVerdict {
    pub fn is_accept(&self) -> bool {
        matches!(self, ValidationVerdict::Accept(_))
    }

    pub fn action(&self) -> Option<&ActionValue> {
        match self {
            ValidationVerdict::Accept(action) => Some(action),
            ValidationVerdict::Reject(_) => None,
        }
    }

    pub fn reject_reason(&self) -> Option<&RejectReason> {
        match self {
            ValidationVerdict::Accept(_) => None,
            ValidationVerdict::Reject(reason) => Some(reason),
        }
    }
}

/// Classify a raw attempt against the expected output schema.
///
/// Pure and side-effect free. Checks, in order: byte bound, whole-input JSON
/// parse, object shape, exact field set, field types.
pub fn check(attempt: &Attempt, schema: &OutputSchema) -> ValidationVerdict {
    let raw = attempt.raw.as_str();
    if raw.len() > schema.max_bytes() {
        return ValidationVerdict::Reject(RejectReason::LengthExceeded {
            len: raw.len(),
            max: schema.max_bytes(),
        });
    }

    // serde_json rejects trailing content after the document, which is
    // exactly the "extra content" red flag.
    let value: serde_json::Value = match serde_json::from_str(raw.trim()) {
        Ok(value) => value,
        Err(e) => {
            return ValidationVerdict::Reject(RejectReason::Unparsable {
                detail: e.to_string(),
            });
        }
    };

    let Some(object) = value.as_object() else {
        return ValidationVerdict::Reject(RejectReason::NotAnObject);
    };

    for (name, ty) in schema.fields() {
        match object.get(name) {
            None => {
                return ValidationVerdict::Reject(RejectReason::MissingField {
                    field: name.to_string(),
                });
            }
            Some(field_value) if !ty.matches(field_value) => {
                return ValidationVerdict::Reject(RejectReason::WrongType {
                    field: name.to_string(),
                    expected: ty,
                });
            }
            Some(_) => {}
        }
    }

    if let Some(extra) = object.keys().find(|key| !schema.has_field(key)) {
        return ValidationVerdict::Reject(RejectReason::UnexpectedField {
            field: extra.clone(),
        });
    }

    ValidationVerdict::Accept(ActionValue::new(value))
}
