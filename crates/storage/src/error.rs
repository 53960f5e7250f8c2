//! Typed error enum for the storage layer.
//!
//! Callers match on specific failure modes (already exists, constraint
//! violation, unreachable server) instead of inspecting driver errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Collection or index is already present.
    #[error("{kind} already exists: {name}")]
    AlreadyExists { kind: &'static str, name: String },

    /// Server unreachable, DNS, TLS or authentication failure.
    #[error("connection failure: {0}")]
    ConnectionFailure(String),

    /// Existing documents hold duplicate values, so the unique index cannot be built.
    #[error("cannot create unique index on {namespace}.{field}: {detail}")]
    ConstraintViolation { namespace: String, field: String, detail: String },

    /// An index with the same name or keys but different options exists.
    #[error("conflicting index {index} on {namespace}: {detail}")]
    IndexConflict { namespace: String, index: String, detail: String },

    /// A write violated a unique index.
    #[error("duplicate key in {namespace}: {detail}")]
    DuplicateKey { namespace: String, detail: String },

    /// Document is not a JSON object or cannot be converted for the store.
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    /// Any other server or driver error.
    #[error("database error: {0}")]
    Database(String),
}

impl StoreError {
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }

    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, Self::DuplicateKey { .. })
    }

    /// Whether this error means the store could not be reached at all.
    pub fn is_connection_failure(&self) -> bool {
        matches!(self, Self::ConnectionFailure(_))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidDocument(err.to_string())
    }
}
