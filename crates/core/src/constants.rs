//! Shared constants for docmigrate.

/// Default name of the staging/common database context.
pub const DEFAULT_COMMON_DB: &str = "pp_common_db_stage";

/// Default name of the order service database context.
pub const DEFAULT_ORDER_DB: &str = "order_service_dev";

/// Environment variable holding the MongoDB connection string.
pub const ENV_MONGODB_URI: &str = "MONGODB_URI";

/// Environment variable overriding the common context name.
pub const ENV_COMMON_DB: &str = "DOCMIGRATE_COMMON_DB";

/// Environment variable overriding the order service context name.
pub const ENV_ORDER_DB: &str = "DOCMIGRATE_ORDER_DB";

/// Environment variable for the driver's server selection timeout.
pub const ENV_SERVER_SELECTION_TIMEOUT_SECS: &str = "DOCMIGRATE_SERVER_SELECTION_TIMEOUT_SECS";

/// Driver server selection timeout in seconds when not configured.
pub const DEFAULT_SERVER_SELECTION_TIMEOUT_SECS: u64 = 10;

/// Identifier of the base provisioning step.
pub const BASE_PROVISIONING_STEP_ID: &str = "2025.08.01.01";

/// Message emitted once a step has been applied.
pub const COMPLETION_MESSAGE: &str = "Collections created successfully";

/// MongoDB caps database names at 64 bytes including the terminator.
pub const MAX_DATABASE_NAME_BYTES: usize = 63;
