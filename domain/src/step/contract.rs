//! Immutable step contracts.

use super::schema::OutputSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Identifier for one step, derived from `(cursor, contract hash)`.
///
/// Two contracts with the same cursor but different instructions or schemas
/// get different ids, which makes retry rounds for the same step traceable
/// in the audit trail.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepId(String);

impl StepId {
    fn derive(cursor: u64, instruction: &str, schema: &OutputSchema) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(cursor.to_be_bytes());
        hasher.update(instruction.as_bytes());
        hasher.update(schema.hint().as_bytes());
        let digest = hasher.finalize();
        Self(format!("s{cursor:08}-{}", &hex::encode(digest)[..8]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StepId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One atomic unit of work, produced by the decomposer.
///
/// Immutable once issued: retry rounds reissue the identical contract, and
/// attempts never see anything beyond it (no prior attempts, no history).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepContract {
    id: StepId,
    cursor: u64,
    instruction: String,
    schema: OutputSchema,
}

impl StepContract {
    pub fn new(cursor: u64, instruction: impl Into<String>, schema: OutputSchema) -> Self {
        let instruction = instruction.into();
        let id = StepId::derive(cursor, &instruction, &schema);
        Self {
            id,
            cursor,
            instruction,
            schema,
        }
    }

    pub fn id(&self) -> &StepId {
        &self.id
    }

    pub fn cursor(&self) -> u64 {
        self.cursor
    }

    /// The instruction payload sent to the oracle.
    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    /// The expected output contract attempts are validated against.
    pub fn schema(&self) -> &OutputSchema {
        &self.schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::schema::FieldType;

    fn schema() -> OutputSchema {
        OutputSchema::new().field("op", FieldType::String)
    }

    #[test]
    fn test_id_is_stable() {
        let a = StepContract::new(3, "toggle the switch", schema());
        let b = StepContract::new(3, "toggle the switch", schema());
        assert_eq!(a.id(), b.id());
    }

    #[test]
    fn test_id_depends_on_cursor_and_payload() {
        let base = StepContract::new(3, "toggle the switch", schema());
        let other_cursor = StepContract::new(4, "toggle the switch", schema());
        let other_instruction = StepContract::new(3, "flip the switch", schema());
        let other_schema = StepContract::new(
            3,
            "toggle the switch",
            schema().field("n", FieldType::Integer),
        );

        assert_ne!(base.id(), other_cursor.id());
        assert_ne!(base.id(), other_instruction.id());
        assert_ne!(base.id(), other_schema.id());
    }

    #[test]
    fn test_id_embeds_cursor() {
        let contract = StepContract::new(42, "x", schema());
        assert!(contract.id().as_str().starts_with("s00000042-"));
    }
}
