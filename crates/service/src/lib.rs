//! Service layer for docmigrate
//!
//! Applies a migration step operation by operation and verifies that its
//! post-conditions hold in the target store.

#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]

mod error;
mod migration_service;
mod report;
#[cfg(test)]
mod tests;

pub use error::ServiceError;
pub use migration_service::MigrationService;
pub use report::{MigrationReport, Missing, OperationReport, Outcome, VerifyReport};
