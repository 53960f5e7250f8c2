//! Unified storage backend with enum dispatch.

use async_trait::async_trait;
use docmigrate_core::{CollectionName, DatabaseName, UniqueIndex};

use crate::error::StoreError;
use crate::memory::MemoryStore;
use crate::traits::DocumentStore;
use crate::types::IndexInfo;

macro_rules! dispatch {
    ($self:expr, $method:ident ( $($arg:expr),* $(,)? )) => {
        match $self {
            StoreBackend::Memory(s) => <MemoryStore as DocumentStore>::$method(s, $($arg),*).await,
            #[cfg(feature = "mongodb")]
            StoreBackend::Mongo(s) => {
                <crate::mongo::MongoStore as DocumentStore>::$method(s, $($arg),*).await
            },
        }
    };
}

#[derive(Clone, Debug)]
pub enum StoreBackend {
    Memory(MemoryStore),
    #[cfg(feature = "mongodb")]
    Mongo(crate::mongo::MongoStore),
}

impl StoreBackend {
    pub fn new_memory() -> Self {
        Self::Memory(MemoryStore::new())
    }

    #[cfg(feature = "mongodb")]
    pub async fn new_mongo(
        uri: &str,
        server_selection_timeout: std::time::Duration,
    ) -> Result<Self, StoreError> {
        Ok(Self::Mongo(crate::mongo::MongoStore::connect(uri, server_selection_timeout).await?))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            #[cfg(feature = "mongodb")]
            Self::Mongo(_) => "mongodb",
        }
    }
}

#[async_trait]
impl DocumentStore for StoreBackend {
    async fn create_collection(
        &self,
        db: &DatabaseName,
        collection: &CollectionName,
    ) -> Result<(), StoreError> {
        dispatch!(self, create_collection(db, collection))
    }

    async fn create_unique_index(
        &self,
        db: &DatabaseName,
        index: &UniqueIndex,
    ) -> Result<(), StoreError> {
        dispatch!(self, create_unique_index(db, index))
    }

    async fn list_collection_names(&self, db: &DatabaseName) -> Result<Vec<String>, StoreError> {
        dispatch!(self, list_collection_names(db))
    }

    async fn list_indexes(
        &self,
        db: &DatabaseName,
        collection: &CollectionName,
    ) -> Result<Vec<IndexInfo>, StoreError> {
        dispatch!(self, list_indexes(db, collection))
    }

    async fn insert_document(
        &self,
        db: &DatabaseName,
        collection: &CollectionName,
        document: serde_json::Value,
    ) -> Result<(), StoreError> {
        dispatch!(self, insert_document(db, collection, document))
    }
}
