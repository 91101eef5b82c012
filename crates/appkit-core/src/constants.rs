//! Environment variable names and shared defaults.

/// Name of the action to run (required).
pub const ENV_ACTION: &str = "ACTION";
/// JSON object holding the action parameters.
pub const ENV_ACTION_PARAMS: &str = "ACTION_PARAMS";
/// Base URL of the backend receiving datastore mirror writes.
pub const ENV_BASE_URL: &str = "BASE_URL";
/// Token sent with datastore mirror writes.
pub const ENV_AUTHORIZATION: &str = "AUTHORIZATION";
/// Identifier of the surrounding execution, used for log correlation.
pub const ENV_EXECUTION_ID: &str = "EXECUTIONID";
/// Timeout (seconds) for a single datastore mirror write.
pub const ENV_DATASTORE_TIMEOUT_SECS: &str = "DATASTORE_TIMEOUT_SECS";

pub const DEFAULT_DATASTORE_TIMEOUT_SECS: u64 = 5;
/// Bounds applied to `DATASTORE_TIMEOUT_SECS`.
pub const MIN_DATASTORE_TIMEOUT_SECS: u64 = 1;
pub const MAX_DATASTORE_TIMEOUT_SECS: u64 = 30;

/// Variables that describe the invocation itself. They are only ever read
/// from the process environment, never from a `.env` file.
pub const PROCESS_ONLY_VARS: [&str; 2] = [ENV_ACTION, ENV_ACTION_PARAMS];

/// Path appended to the base URL for datastore mirror writes.
pub const DATASTORE_PATH: &str = "/api/v1/apps/datastore";

/// Actions whose name starts with this prefix are dispatchable but never listed.
pub const PRIVATE_ACTION_PREFIX: &str = "_";
