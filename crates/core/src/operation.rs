use std::fmt;

use serde::{Deserialize, Serialize};

use crate::names::{CollectionName, DatabaseName, FieldName};

/// Single-field ascending unique index on a collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UniqueIndex {
    pub collection: CollectionName,
    pub field: FieldName,
}

impl UniqueIndex {
    pub fn new(collection: CollectionName, field: FieldName) -> Self {
        Self { collection, field }
    }

    /// Name the server assigns to a `{ field: 1 }` index.
    pub fn index_name(&self) -> String {
        format!("{}_1", self.field)
    }
}

/// One schema provisioning operation, always scoped to an explicit context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    CreateCollection { context: DatabaseName, collection: CollectionName },
    CreateUniqueIndex { context: DatabaseName, index: UniqueIndex },
}

impl Operation {
    pub fn context(&self) -> &DatabaseName {
        match self {
            Self::CreateCollection { context, .. } | Self::CreateUniqueIndex { context, .. } => {
                context
            },
        }
    }

    pub fn collection(&self) -> &CollectionName {
        match self {
            Self::CreateCollection { collection, .. } => collection,
            Self::CreateUniqueIndex { index, .. } => &index.collection,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateCollection { context, collection } => {
                write!(f, "create collection {context}.{collection}")
            },
            Self::CreateUniqueIndex { context, index } => {
                write!(
                    f,
                    "create unique index {} on {context}.{}",
                    index.index_name(),
                    index.collection
                )
            },
        }
    }
}
