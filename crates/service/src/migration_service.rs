use std::sync::Arc;

use docmigrate_core::{COMPLETION_MESSAGE, MigrationStep, Operation};
use docmigrate_storage::{DocumentStore, StoreBackend, StoreError};

use crate::error::ServiceError;
use crate::report::{MigrationReport, Missing, OperationReport, Outcome, VerifyReport};

pub struct MigrationService {
    storage: Arc<StoreBackend>,
}

impl MigrationService {
    #[must_use]
    pub const fn new(storage: Arc<StoreBackend>) -> Self {
        Self { storage }
    }

    /// Apply every operation of `step` in order.
    ///
    /// Anything already present counts as success, so re-running a step is
    /// safe. The first other failure stops the step.
    pub async fn apply(&self, step: &MigrationStep) -> Result<MigrationReport, ServiceError> {
        tracing::info!(
            step = %step.id,
            operations = step.operations.len(),
            backend = self.storage.kind(),
            "Applying migration step"
        );

        let mut operations = Vec::with_capacity(step.operations.len());
        for op in &step.operations {
            let outcome = self.apply_operation(op).await.map_err(|source| {
                tracing::error!(step = %step.id, operation = %op, "{source}");
                ServiceError::Operation { operation: op.to_string(), source }
            })?;
            operations.push(OperationReport { operation: op.clone(), outcome });
        }

        let report =
            MigrationReport { step_id: step.id.clone(), backend: self.storage.kind(), operations };
        tracing::info!(
            step = %step.id,
            created = report.count(Outcome::Created),
            already_present = report.count(Outcome::AlreadyPresent),
            "{COMPLETION_MESSAGE}"
        );
        Ok(report)
    }

    async fn apply_operation(&self, op: &Operation) -> Result<Outcome, StoreError> {
        let result = match op {
            Operation::CreateCollection { context, collection } => {
                self.storage.create_collection(context, collection).await
            },
            Operation::CreateUniqueIndex { context, index } => {
                self.storage.create_unique_index(context, index).await
            },
        };
        match result {
            Ok(()) => {
                tracing::info!(operation = %op, "created");
                Ok(Outcome::Created)
            },
            Err(err) if err.is_already_exists() => {
                tracing::debug!(operation = %op, "already present, skipping");
                Ok(Outcome::AlreadyPresent)
            },
            Err(err) => Err(err),
        }
    }

    /// Check the step's post-conditions without changing the store.
    pub async fn verify(&self, step: &MigrationStep) -> Result<VerifyReport, ServiceError> {
        let mut missing = Vec::new();

        for context in step.contexts() {
            let present = self.storage.list_collection_names(context).await?;
            for (ctx, collection) in step.collections() {
                if ctx == context && !present.iter().any(|name| name == collection.as_str()) {
                    missing.push(Missing::Collection {
                        context: ctx.clone(),
                        collection: collection.clone(),
                    });
                }
            }
        }

        for (context, index) in step.unique_indexes() {
            let indexes = self.storage.list_indexes(context, &index.collection).await?;
            if !indexes.iter().any(|i| i.is_unique_on(index.field.as_str())) {
                missing.push(Missing::UniqueIndex {
                    context: context.clone(),
                    collection: index.collection.clone(),
                    field: index.field.clone(),
                });
            }
        }

        if missing.is_empty() {
            tracing::info!(step = %step.id, "all post-conditions hold");
        } else {
            tracing::warn!(step = %step.id, missing = missing.len(), "post-conditions not met");
        }
        Ok(VerifyReport { step_id: step.id.clone(), missing })
    }
}
