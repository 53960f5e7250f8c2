use serde::Serialize;

use docmigrate_core::{CollectionName, DatabaseName, UniqueIndex};

use crate::error::StoreError;

/// Index as reported by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexInfo {
    pub name: String,
    pub keys: Vec<String>,
    pub unique: bool,
}

impl IndexInfo {
    /// True when this is a unique index over exactly `field`.
    pub fn is_unique_on(&self, field: &str) -> bool {
        self.unique && self.covers_only(field)
    }

    fn covers_only(&self, field: &str) -> bool {
        self.keys.len() == 1 && self.keys[0] == field
    }
}

/// `<database>.<collection>`, the form the server uses in messages.
pub fn namespace(db: &DatabaseName, collection: &CollectionName) -> String {
    format!("{db}.{collection}")
}

/// Decide whether `wanted` is already satisfied by, or clashes with, `existing`.
///
/// A unique index on the same single key satisfies it whatever its name.
/// A non-unique index holding the conventional name or the same key clashes.
pub(crate) fn check_existing_index(
    existing: &[IndexInfo],
    ns: &str,
    wanted: &UniqueIndex,
) -> Result<(), StoreError> {
    let field = wanted.field.as_str();
    if let Some(found) = existing.iter().find(|i| i.is_unique_on(field)) {
        return Err(StoreError::AlreadyExists {
            kind: "index",
            name: format!("{ns}.{}", found.name),
        });
    }
    let name = wanted.index_name();
    match existing.iter().find(|i| i.name == name || i.covers_only(field)) {
        Some(found) => Err(StoreError::IndexConflict {
            namespace: ns.to_owned(),
            index: found.name.clone(),
            detail: format!("existing index on {:?} is not unique", found.keys),
        }),
        None => Ok(()),
    }
}
