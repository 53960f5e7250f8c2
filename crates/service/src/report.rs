use docmigrate_core::{CollectionName, DatabaseName, FieldName, Operation};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Created,
    AlreadyPresent,
}

#[derive(Debug, Clone, Serialize)]
pub struct OperationReport {
    pub operation: Operation,
    pub outcome: Outcome,
}

/// Result of applying one step.
#[derive(Debug, Clone, Serialize)]
pub struct MigrationReport {
    pub step_id: String,
    pub backend: &'static str,
    pub operations: Vec<OperationReport>,
}

impl MigrationReport {
    pub fn count(&self, outcome: Outcome) -> usize {
        self.operations.iter().filter(|r| r.outcome == outcome).count()
    }

    /// True when the store already held everything the step creates.
    pub fn is_noop(&self) -> bool {
        self.operations.iter().all(|r| r.outcome == Outcome::AlreadyPresent)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Missing {
    Collection { context: DatabaseName, collection: CollectionName },
    UniqueIndex { context: DatabaseName, collection: CollectionName, field: FieldName },
}

/// Post-conditions of a step that do not hold in the store.
#[derive(Debug, Clone, Serialize)]
pub struct VerifyReport {
    pub step_id: String,
    pub missing: Vec<Missing>,
}

impl VerifyReport {
    pub fn is_satisfied(&self) -> bool {
        self.missing.is_empty()
    }
}
