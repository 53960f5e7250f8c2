//! Runtime configuration read from the environment.

use serde::Serialize;

use crate::constants::{
    DEFAULT_COMMON_DB, DEFAULT_ORDER_DB, DEFAULT_SERVER_SELECTION_TIMEOUT_SECS, ENV_COMMON_DB,
    ENV_MONGODB_URI, ENV_ORDER_DB, ENV_SERVER_SELECTION_TIMEOUT_SECS,
};
use crate::error::{CoreError, Result};
use crate::names::DatabaseName;

/// Numeric setting from the environment. Unset means `default`; a value
/// that does not parse is logged and also falls back to `default`.
fn parse_env_or<T>(var: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display,
{
    let Ok(raw) = std::env::var(var) else {
        return default;
    };
    raw.trim().parse().unwrap_or_else(|_| {
        tracing::warn!(var, value = %raw, default = %default, "unparsable setting, using default");
        default
    })
}

/// The two database contexts the base step provisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextNames {
    pub common: DatabaseName,
    pub order_service: DatabaseName,
}

impl Default for ContextNames {
    fn default() -> Self {
        Self {
            common: DatabaseName(DEFAULT_COMMON_DB.to_owned()),
            order_service: DatabaseName(DEFAULT_ORDER_DB.to_owned()),
        }
    }
}

impl ContextNames {
    /// Reads overrides from `DOCMIGRATE_COMMON_DB` / `DOCMIGRATE_ORDER_DB`.
    /// Unlike numeric settings, an invalid name is an error rather than a fallback.
    pub fn from_env() -> Result<Self> {
        let common = match std::env::var(ENV_COMMON_DB) {
            Ok(v) => DatabaseName::new(v)?,
            Err(_) => DatabaseName(DEFAULT_COMMON_DB.to_owned()),
        };
        let order_service = match std::env::var(ENV_ORDER_DB) {
            Ok(v) => DatabaseName::new(v)?,
            Err(_) => DatabaseName(DEFAULT_ORDER_DB.to_owned()),
        };
        Ok(Self { common, order_service })
    }
}

#[derive(Debug, Clone)]
pub struct MigrateConfig {
    pub mongodb_uri: Option<String>,
    pub contexts: ContextNames,
    pub server_selection_timeout_secs: u64,
}

impl MigrateConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            mongodb_uri: std::env::var(ENV_MONGODB_URI).ok().filter(|v| !v.trim().is_empty()),
            contexts: ContextNames::from_env()?,
            server_selection_timeout_secs: parse_env_or(
                ENV_SERVER_SELECTION_TIMEOUT_SECS,
                DEFAULT_SERVER_SELECTION_TIMEOUT_SECS,
            ),
        })
    }

    pub fn require_mongodb_uri(&self) -> Result<&str> {
        self.mongodb_uri.as_deref().ok_or(CoreError::MissingConfig(ENV_MONGODB_URI))
    }
}
