//! Expected output schemas for step contracts.
//!
//! A schema names the exact field set an oracle response must carry, the JSON
//! type of each field, and a maximum byte length. Validation is fail-closed:
//! anything outside the schema is rejected outright.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// JSON type expected for a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
}

impl FieldType {
    /// Whether a JSON value has this type.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Integer => value.is_i64() || value.is_u64(),
            FieldType::Number => value.is_number(),
            FieldType::Boolean => value.is_boolean(),
            FieldType::Array => value.is_array(),
            FieldType::Object => value.is_object(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Array => "array",
            FieldType::Object => "object",
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The exact shape an accepted oracle response must have.
///
/// # Example
///
/// ```
/// use stepwise_domain::{FieldType, OutputSchema};
///
/// let schema = OutputSchema::new()
///     .field("op", FieldType::String)
///     .field("n", FieldType::Integer)
///     .with_max_bytes(256);
/// assert_eq!(schema.hint(), r#"{"n": integer, "op": string} (max 256 bytes)"#);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSchema {
    fields: BTreeMap<String, FieldType>,
    max_bytes: usize,
}

impl OutputSchema {
    /// Default response size bound.
    pub const DEFAULT_MAX_BYTES: usize = 4096;

    pub fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
            max_bytes: Self::DEFAULT_MAX_BYTES,
        }
    }

    /// Add a required field. The field set is exact: responses must carry
    /// every declared field and nothing else.
    pub fn field(mut self, name: impl Into<String>, ty: FieldType) -> Self {
        self.fields.insert(name.into(), ty);
        self
    }

    /// Tighten (or relax) the maximum response length in bytes.
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Declared fields in name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, FieldType)> {
        self.fields.iter().map(|(name, ty)| (name.as_str(), *ty))
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Compact schema description suitable for inclusion in an oracle prompt.
    pub fn hint(&self) -> String {
        let fields = self
            .fields
            .iter()
            .map(|(name, ty)| format!("{name:?}: {ty}"))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{{{fields}}} (max {} bytes)", self.max_bytes)
    }
}

impl Default for OutputSchema {
    fn default() -> Self {
        Self::new()
    }
}
