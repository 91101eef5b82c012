//! Action system core infrastructure
//!
//! An action is a named operation exposed by an app. Every action receives
//! the same context and its decoded parameters, and returns either a success
//! payload or an `ActionError`.

use appkit_core::{ActionParams, ActionResult, Payload};
use appkit_infra::Datastore;
use async_trait::async_trait;
use std::fmt::Debug;

/// Identity of the app hosting the actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInfo {
    pub name: String,
    pub version: String,
    pub description: String,
}

impl AppInfo {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            description: description.into(),
        }
    }
}

/// Context provided to actions during execution
#[derive(Debug, Clone)]
pub struct ActionContext {
    pub app: AppInfo,
    /// Identifier of the surrounding execution
    pub execution_id: String,
    /// Key/value store scoped to this process
    pub datastore: Datastore,
}

impl ActionContext {
    pub fn new(app: AppInfo, execution_id: impl Into<String>, datastore: Datastore) -> Self {
        Self {
            app,
            execution_id: execution_id.into(),
            datastore,
        }
    }
}

/// Trait that all actions must implement
#[async_trait]
pub trait Action: Send + Sync + Debug {
    /// Name the action is dispatched by
    fn name(&self) -> &str;

    /// Human-readable description
    fn description(&self) -> &str {
        ""
    }

    /// Execute the action with the given parameters
    async fn execute(&self, context: &ActionContext, params: ActionParams)
        -> ActionResult<Payload>;
}

/// Build a payload from a `json!` object literal.
pub(crate) fn payload(value: serde_json::Value) -> Payload {
    match value {
        serde_json::Value::Object(map) => map,
        other => {
            let mut map = Payload::new();
            map.insert("result".to_string(), other);
            map
        }
    }
}
