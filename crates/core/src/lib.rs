//! Core types for docmigrate
//!
//! Validated database, collection and field names, the operations a
//! migration step is made of, and environment-driven configuration.
//! Shared by the storage, service and CLI crates.

mod config;
mod constants;
mod error;
mod names;
mod operation;
mod step;

pub use config::{ContextNames, MigrateConfig};
pub use constants::*;
pub use error::*;
pub use names::{CollectionName, DatabaseName, FieldName};
pub use operation::{Operation, UniqueIndex};
pub use step::MigrationStep;
