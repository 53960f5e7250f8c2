use std::result::Result as StdResult;

use thiserror::Error;

/// Errors raised while building domain values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid {kind} name {name:?}: {reason}")]
    InvalidName { kind: &'static str, name: String, reason: &'static str },

    #[error("missing configuration: {0}")]
    MissingConfig(&'static str),
}

pub type Result<T> = StdResult<T, CoreError>;
