//! MongoDB storage backend using the official driver.

use std::time::Duration;

use async_trait::async_trait;
use docmigrate_core::{CollectionName, DatabaseName, UniqueIndex};
use futures_util::TryStreamExt;
use mongodb::bson::{Document, doc};
use mongodb::error::{CommandError, ErrorKind, WriteFailure};
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, IndexModel};

use crate::error::StoreError;
use crate::traits::DocumentStore;
use crate::types::{IndexInfo, check_existing_index, namespace};

const APP_NAME: &str = "docmigrate";

// Server error codes.
const NAMESPACE_NOT_FOUND: i32 = 26;
const NAMESPACE_EXISTS: i32 = 48;
const INDEX_OPTIONS_CONFLICT: i32 = 85;
const INDEX_KEY_SPECS_CONFLICT: i32 = 86;
const DUPLICATE_KEY: i32 = 11000;

#[derive(Clone, Debug)]
pub struct MongoStore {
    client: Client,
}

impl MongoStore {
    /// Connect and ping so an unreachable server fails here, not mid-step.
    pub async fn connect(
        uri: &str,
        server_selection_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let mut options = ClientOptions::parse(uri).await.map_err(StoreError::from)?;
        options.app_name = Some(APP_NAME.to_owned());
        options.server_selection_timeout = Some(server_selection_timeout);
        let client = Client::with_options(options)?;
        client.database("admin").run_command(doc! { "ping": 1 }, None).await?;
        tracing::info!("MongoStore connected");
        Ok(Self { client })
    }

    fn collection(
        &self,
        db: &DatabaseName,
        collection: &CollectionName,
    ) -> mongodb::Collection<Document> {
        self.client.database(db.as_str()).collection::<Document>(collection.as_str())
    }
}

fn command_code(err: &mongodb::error::Error) -> Option<i32> {
    match err.kind.as_ref() {
        ErrorKind::Command(CommandError { code, .. }) => Some(*code),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => Some(write_error.code),
        ErrorKind::Write(WriteFailure::WriteConcernError(wc)) => Some(wc.code),
        _ => None,
    }
}

fn index_info(model: &IndexModel) -> IndexInfo {
    let options = model.options.as_ref();
    IndexInfo {
        name: options.and_then(|o| o.name.clone()).unwrap_or_default(),
        keys: model.keys.keys().cloned().collect(),
        unique: options.and_then(|o| o.unique).unwrap_or(false),
    }
}

/// Generic mapping; call sites with more context remap codes themselves.
impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        match err.kind.as_ref() {
            ErrorKind::ServerSelection { .. }
            | ErrorKind::Io(_)
            | ErrorKind::DnsResolve { .. }
            | ErrorKind::Authentication { .. }
            | ErrorKind::ConnectionPoolCleared { .. } => Self::ConnectionFailure(err.to_string()),
            _ => Self::Database(err.to_string()),
        }
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn create_collection(
        &self,
        db: &DatabaseName,
        collection: &CollectionName,
    ) -> Result<(), StoreError> {
        match self.client.database(db.as_str()).create_collection(collection.as_str(), None).await {
            Ok(()) => Ok(()),
            Err(err) if command_code(&err) == Some(NAMESPACE_EXISTS) => {
                Err(StoreError::AlreadyExists {
                    kind: "collection",
                    name: namespace(db, collection),
                })
            },
            Err(err) => Err(err.into()),
        }
    }

    async fn create_unique_index(
        &self,
        db: &DatabaseName,
        index: &UniqueIndex,
    ) -> Result<(), StoreError> {
        let ns = namespace(db, &index.collection);
        let name = index.index_name();
        let field = index.field.as_str();

        // The server answers an identical createIndexes with success, so look first.
        let existing = self.list_indexes(db, &index.collection).await?;
        check_existing_index(&existing, &ns, index)?;

        let model = IndexModel::builder()
            .keys(doc! { field: 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        match self.collection(db, &index.collection).create_index(model, None).await {
            Ok(_) => Ok(()),
            Err(err) => match command_code(&err) {
                Some(DUPLICATE_KEY) => Err(StoreError::ConstraintViolation {
                    namespace: ns,
                    field: field.to_owned(),
                    detail: err.to_string(),
                }),
                Some(INDEX_OPTIONS_CONFLICT | INDEX_KEY_SPECS_CONFLICT) => {
                    Err(StoreError::IndexConflict {
                        namespace: ns,
                        index: name,
                        detail: err.to_string(),
                    })
                },
                _ => Err(err.into()),
            },
        }
    }

    async fn list_collection_names(&self, db: &DatabaseName) -> Result<Vec<String>, StoreError> {
        let mut names = self.client.database(db.as_str()).list_collection_names(None).await?;
        names.sort();
        Ok(names)
    }

    async fn list_indexes(
        &self,
        db: &DatabaseName,
        collection: &CollectionName,
    ) -> Result<Vec<IndexInfo>, StoreError> {
        let cursor = match self.collection(db, collection).list_indexes(None).await {
            Ok(cursor) => cursor,
            Err(err) if command_code(&err) == Some(NAMESPACE_NOT_FOUND) => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        let models: Vec<IndexModel> = cursor.try_collect().await?;
        Ok(models.iter().map(index_info).collect())
    }

    async fn insert_document(
        &self,
        db: &DatabaseName,
        collection: &CollectionName,
        document: serde_json::Value,
    ) -> Result<(), StoreError> {
        if !document.is_object() {
            return Err(StoreError::InvalidDocument("document must be a JSON object".to_owned()));
        }
        let document = mongodb::bson::to_document(&document)
            .map_err(|e| StoreError::InvalidDocument(e.to_string()))?;
        match self.collection(db, collection).insert_one(document, None).await {
            Ok(_) => Ok(()),
            Err(err) if command_code(&err) == Some(DUPLICATE_KEY) => {
                Err(StoreError::DuplicateKey {
                    namespace: namespace(db, collection),
                    detail: err.to_string(),
                })
            },
            Err(err) => Err(err.into()),
        }
    }
}
