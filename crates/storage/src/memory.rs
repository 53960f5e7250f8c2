//! In-process document store.
//!
//! Mirrors the server semantics the migration relies on: implicit collection
//! creation on index build and insert, `_id_` on every collection, unique
//! indexes where a missing field counts as `null`, and top-level numbers that
//! compare by value (`1` and `1.0` collide).

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use docmigrate_core::{CollectionName, DatabaseName, FieldName, UniqueIndex};
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::traits::DocumentStore;
use crate::types::{IndexInfo, check_existing_index, namespace};

const ID_FIELD: &str = "_id";
const ID_INDEX_NAME: &str = "_id_";
static NULL: Value = Value::Null;

/// Equality as a unique index sees it.
fn same_key(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x == y,
            _ => x.as_f64() == y.as_f64(),
        },
        _ => a == b,
    }
}

#[derive(Debug)]
struct MemIndex {
    field: String,
    unique: bool,
}

#[derive(Debug, Default)]
struct MemCollection {
    /// Single-field indexes in creation order, `_id_` excluded.
    indexes: Vec<MemIndex>,
    documents: Vec<Map<String, Value>>,
}

impl MemCollection {
    fn conflicting_value<'a>(&self, doc: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
        let value = doc.get(field).unwrap_or(&NULL);
        self.documents
            .iter()
            .any(|existing| same_key(existing.get(field).unwrap_or(&NULL), value))
            .then_some(value)
    }

    fn first_duplicate(&self, field: &str) -> Option<Value> {
        let mut seen: Vec<&Value> = Vec::with_capacity(self.documents.len());
        for doc in &self.documents {
            let value = doc.get(field).unwrap_or(&NULL);
            if seen.iter().any(|s| same_key(s, value)) {
                return Some(value.clone());
            }
            seen.push(value);
        }
        None
    }

    fn index_infos(&self) -> Vec<IndexInfo> {
        let mut infos = vec![IndexInfo {
            name: ID_INDEX_NAME.to_owned(),
            keys: vec![ID_FIELD.to_owned()],
            unique: true,
        }];
        infos.extend(self.indexes.iter().map(|index| IndexInfo {
            name: format!("{}_1", index.field),
            keys: vec![index.field.clone()],
            unique: index.unique,
        }));
        infos
    }
}

type Databases = BTreeMap<String, BTreeMap<String, MemCollection>>;

/// Shared, cloneable in-memory store. Clones observe the same data.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    databases: Arc<RwLock<Databases>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plain (non-unique) `{ field: 1 }` index, as an application might have
    /// created before the migration ran. A repeat call is a no-op.
    pub async fn create_index(
        &self,
        db: &DatabaseName,
        collection: &CollectionName,
        field: &FieldName,
    ) -> Result<(), StoreError> {
        let mut databases = self.databases.write().await;
        let coll = databases
            .entry(db.as_str().to_owned())
            .or_default()
            .entry(collection.as_str().to_owned())
            .or_default();
        if !coll.indexes.iter().any(|i| i.field == field.as_str()) {
            coll.indexes.push(MemIndex { field: field.as_str().to_owned(), unique: false });
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create_collection(
        &self,
        db: &DatabaseName,
        collection: &CollectionName,
    ) -> Result<(), StoreError> {
        let mut databases = self.databases.write().await;
        let collections = databases.entry(db.as_str().to_owned()).or_default();
        if collections.contains_key(collection.as_str()) {
            return Err(StoreError::AlreadyExists {
                kind: "collection",
                name: namespace(db, collection),
            });
        }
        collections.insert(collection.as_str().to_owned(), MemCollection::default());
        tracing::debug!(namespace = %namespace(db, collection), "memory: collection created");
        Ok(())
    }

    async fn create_unique_index(
        &self,
        db: &DatabaseName,
        index: &UniqueIndex,
    ) -> Result<(), StoreError> {
        let ns = namespace(db, &index.collection);
        let mut databases = self.databases.write().await;
        let coll = databases
            .entry(db.as_str().to_owned())
            .or_default()
            .entry(index.collection.as_str().to_owned())
            .or_default();
        let field = index.field.as_str();

        check_existing_index(&coll.index_infos(), &ns, index)?;
        if let Some(value) = coll.first_duplicate(field) {
            return Err(StoreError::ConstraintViolation {
                namespace: ns,
                field: field.to_owned(),
                detail: format!("duplicate value {value}"),
            });
        }
        coll.indexes.push(MemIndex { field: field.to_owned(), unique: true });
        Ok(())
    }

    async fn list_collection_names(&self, db: &DatabaseName) -> Result<Vec<String>, StoreError> {
        let databases = self.databases.read().await;
        Ok(databases.get(db.as_str()).map(|c| c.keys().cloned().collect()).unwrap_or_default())
    }

    async fn list_indexes(
        &self,
        db: &DatabaseName,
        collection: &CollectionName,
    ) -> Result<Vec<IndexInfo>, StoreError> {
        let databases = self.databases.read().await;
        Ok(databases
            .get(db.as_str())
            .and_then(|c| c.get(collection.as_str()))
            .map(MemCollection::index_infos)
            .unwrap_or_default())
    }

    async fn insert_document(
        &self,
        db: &DatabaseName,
        collection: &CollectionName,
        document: Value,
    ) -> Result<(), StoreError> {
        let Value::Object(doc) = document else {
            return Err(StoreError::InvalidDocument("document must be a JSON object".to_owned()));
        };
        let mut databases = self.databases.write().await;
        let coll = databases
            .entry(db.as_str().to_owned())
            .or_default()
            .entry(collection.as_str().to_owned())
            .or_default();

        if doc.contains_key(ID_FIELD) {
            if let Some(value) = coll.conflicting_value(&doc, ID_FIELD) {
                return Err(StoreError::DuplicateKey {
                    namespace: namespace(db, collection),
                    detail: format!("index {ID_INDEX_NAME} dup key {value}"),
                });
            }
        }
        for index in coll.indexes.iter().filter(|i| i.unique) {
            let field = index.field.as_str();
            if let Some(value) = coll.conflicting_value(&doc, field) {
                return Err(StoreError::DuplicateKey {
                    namespace: namespace(db, collection),
                    detail: format!("index {field}_1 dup key {{ {field}: {value} }}"),
                });
            }
        }
        coll.documents.push(doc);
        Ok(())
    }
}
