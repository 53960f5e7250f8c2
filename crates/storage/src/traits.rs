//! Target store contract.
//!
//! Every call names its database context explicitly; there is no selected
//! "current" database.

use async_trait::async_trait;
use docmigrate_core::{CollectionName, DatabaseName, UniqueIndex};

use crate::error::StoreError;
use crate::types::IndexInfo;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create `collection` in `db`. Fails with `AlreadyExists` if present.
    async fn create_collection(
        &self,
        db: &DatabaseName,
        collection: &CollectionName,
    ) -> Result<(), StoreError>;

    /// Create a unique `{ field: 1 }` index, creating the collection if needed.
    ///
    /// Fails with `AlreadyExists` when an identical index is present,
    /// `IndexConflict` when a same-named index differs, and
    /// `ConstraintViolation` when existing documents hold duplicate values.
    async fn create_unique_index(
        &self,
        db: &DatabaseName,
        index: &UniqueIndex,
    ) -> Result<(), StoreError>;

    /// Collection names in `db`, sorted.
    async fn list_collection_names(&self, db: &DatabaseName) -> Result<Vec<String>, StoreError>;

    /// Indexes on `collection`. Empty when the collection does not exist.
    async fn list_indexes(
        &self,
        db: &DatabaseName,
        collection: &CollectionName,
    ) -> Result<Vec<IndexInfo>, StoreError>;

    /// Insert one JSON object. Fails with `DuplicateKey` on a unique violation.
    async fn insert_document(
        &self,
        db: &DatabaseName,
        collection: &CollectionName,
        document: serde_json::Value,
    ) -> Result<(), StoreError>;
}
