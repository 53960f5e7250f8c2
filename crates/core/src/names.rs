//! Validated names for database contexts, collections and fields.
//!
//! Names are checked once at construction against MongoDB's naming rules,
//! so every operation built from them is known to be addressable.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::MAX_DATABASE_NAME_BYTES;
use crate::error::{CoreError, Result};

const DATABASE_FORBIDDEN: &[char] = &['/', '\\', '.', ' ', '"', '$', '*', '<', '>', ':', '|', '?', '\0'];

macro_rules! validated_name {
    ($(#[$meta:meta])* $name:ident, $validate:path) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(pub(crate) String);

        impl $name {
            pub fn new(name: impl Into<String>) -> Result<Self> {
                let name = name.into();
                $validate(&name)?;
                Ok(Self(name))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = CoreError;

            fn try_from(value: String) -> Result<Self> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self> {
                Self::new(s)
            }
        }
    };
}

validated_name!(
    /// Name of a logical database context.
    DatabaseName,
    validate_database
);

validated_name!(
    /// Name of a collection inside a database context.
    CollectionName,
    validate_collection
);

validated_name!(
    /// Name of a top-level document field.
    FieldName,
    validate_field
);

fn invalid(kind: &'static str, name: &str, reason: &'static str) -> CoreError {
    CoreError::InvalidName { kind, name: name.to_owned(), reason }
}

fn validate_database(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(invalid("database", name, "must not be empty"));
    }
    if name.len() > MAX_DATABASE_NAME_BYTES {
        return Err(invalid("database", name, "must be at most 63 bytes"));
    }
    if name.contains(DATABASE_FORBIDDEN) {
        return Err(invalid("database", name, "contains a forbidden character"));
    }
    Ok(())
}

fn validate_collection(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(invalid("collection", name, "must not be empty"));
    }
    if name.contains(['$', '\0']) {
        return Err(invalid("collection", name, "must not contain '$' or NUL"));
    }
    if name.starts_with("system.") {
        return Err(invalid("collection", name, "the system. prefix is reserved"));
    }
    Ok(())
}

fn validate_field(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(invalid("field", name, "must not be empty"));
    }
    if name.starts_with('$') {
        return Err(invalid("field", name, "must not start with '$'"));
    }
    if name.contains('\0') {
        return Err(invalid("field", name, "must not contain NUL"));
    }
    Ok(())
}
