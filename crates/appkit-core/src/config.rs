//! Configuration module
//!
//! The runner is configured entirely from the process environment. Values are
//! read once at start-up; `from_lookup` exists so tests can supply a fixed
//! environment without touching the real one.

use std::collections::HashMap;
use std::env;
use std::path::Path;
use std::time::Duration;

use crate::constants::*;
use crate::error::ConfigError;
use crate::invocation::{ActionParams, InvocationRequest};

/// Where datastore writes are mirrored to.
#[derive(Clone, PartialEq, Eq)]
pub struct MirrorTarget {
    pub url: String,
    pub authorization: String,
}

impl std::fmt::Debug for MirrorTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MirrorTarget")
            .field("url", &self.url)
            .field("authorization", &"<redacted>")
            .finish()
    }
}

/// Runner configuration
#[derive(Clone, Debug)]
pub struct RunnerConfig {
    action: Option<String>,
    raw_params: Option<String>,
    base_url: Option<String>,
    authorization: Option<String>,
    execution_id: String,
    datastore_timeout_secs: u64,
}

impl RunnerConfig {
    /// Load configuration from the process environment.
    ///
    /// A `.env` file, if one is found, supplies settings the environment
    /// lacks. The invocation itself (`ACTION`, `ACTION_PARAMS`) is never
    /// taken from it.
    pub fn from_env() -> Self {
        let file = match dotenvy::dotenv_iter() {
            Ok(iter) => collect_env_file(iter),
            Err(_) => HashMap::new(),
        };
        Self::from_layers(|name| env::var(name).ok(), &file)
    }

    /// Like `from_env`, reading the fallback settings from `path`.
    pub fn from_lookup_and_env_file<F>(lookup: F, path: &Path) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = match dotenvy::from_path_iter(path) {
            Ok(iter) => collect_env_file(iter),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "No env file loaded");
                HashMap::new()
            }
        };
        Self::from_layers(lookup, &file)
    }

    fn from_layers<F>(lookup: F, file: &HashMap<String, String>) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_lookup(|name| {
            lookup(name).or_else(|| {
                if PROCESS_ONLY_VARS.contains(&name) {
                    None
                } else {
                    file.get(name).cloned()
                }
            })
        })
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Malformed optional values fall back to their defaults; only a missing
    /// action is fatal, and that is reported by `require_action`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let datastore_timeout_secs = non_empty(ENV_DATASTORE_TIMEOUT_SECS)
            .and_then(|raw| raw.parse::<u64>().ok())
            .unwrap_or(DEFAULT_DATASTORE_TIMEOUT_SECS)
            .clamp(MIN_DATASTORE_TIMEOUT_SECS, MAX_DATASTORE_TIMEOUT_SECS);

        Self {
            action: non_empty(ENV_ACTION),
            // Kept untrimmed: decoding decides what is malformed.
            raw_params: lookup(ENV_ACTION_PARAMS),
            base_url: non_empty(ENV_BASE_URL).map(|u| u.trim_end_matches('/').to_string()),
            authorization: non_empty(ENV_AUTHORIZATION),
            execution_id: non_empty(ENV_EXECUTION_ID)
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            datastore_timeout_secs,
        }
    }

    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    /// The action name, or the fatal configuration error when none was given.
    pub fn require_action(&self) -> Result<&str, ConfigError> {
        self.action().ok_or(ConfigError::MissingAction)
    }

    pub fn raw_params(&self) -> Option<&str> {
        self.raw_params.as_deref()
    }

    pub fn execution_id(&self) -> &str {
        &self.execution_id
    }

    pub fn datastore_timeout(&self) -> Duration {
        Duration::from_secs(self.datastore_timeout_secs)
    }

    /// Mirror endpoint, present only when both a base URL and a token are set.
    pub fn mirror_target(&self) -> Option<MirrorTarget> {
        match (&self.base_url, &self.authorization) {
            (Some(base_url), Some(authorization)) => Some(MirrorTarget {
                url: format!("{}{}", base_url, DATASTORE_PATH),
                authorization: authorization.clone(),
            }),
            _ => None,
        }
    }

    /// Build the invocation request for this process run.
    pub fn invocation_request(&self) -> Result<InvocationRequest, ConfigError> {
        let action = self.require_action()?;
        Ok(InvocationRequest {
            action: action.to_string(),
            params: ActionParams::decode(self.raw_params()),
        })
    }
}

/// Collect the readable entries of a `.env` file, skipping malformed lines.
fn collect_env_file<R: std::io::Read>(iter: dotenvy::Iter<R>) -> HashMap<String, String> {
    iter.filter_map(|item| match item {
        Ok(pair) => Some(pair),
        Err(e) => {
            tracing::warn!(error = %e, "Skipping malformed .env entry");
            None
        }
    })
    .collect()
}
