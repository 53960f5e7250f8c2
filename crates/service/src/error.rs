//! Typed error enum for the service layer.

use docmigrate_storage::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// An operation of the step failed; later operations were not attempted.
    #[error("{operation} failed: {source}")]
    Operation {
        operation: String,
        #[source]
        source: StoreError,
    },

    /// Store call outside of a step operation (verification, listing).
    #[error("storage: {0}")]
    Storage(#[from] StoreError),
}

impl ServiceError {
    fn store_error(&self) -> &StoreError {
        match self {
            Self::Operation { source, .. } => source,
            Self::Storage(e) => e,
        }
    }

    pub fn is_constraint_violation(&self) -> bool {
        matches!(self.store_error(), StoreError::ConstraintViolation { .. })
    }

    pub fn is_index_conflict(&self) -> bool {
        matches!(self.store_error(), StoreError::IndexConflict { .. })
    }
}
