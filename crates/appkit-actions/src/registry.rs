//! Action registry: the table an app's actions are dispatched from

use anyhow::{bail, Result};
use appkit_core::constants::PRIVATE_ACTION_PREFIX;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::action::{Action, AppInfo};
use crate::builtin;

/// Registry mapping action names to their handlers.
///
/// Built once at start-up and read-only afterwards. Names are kept sorted so
/// listings are deterministic.
#[derive(Clone)]
pub struct ActionRegistry {
    app: AppInfo,
    actions: BTreeMap<String, Arc<dyn Action>>,
}

impl ActionRegistry {
    /// Create a registry with no actions at all
    pub fn new(app: AppInfo) -> Self {
        Self {
            app,
            actions: BTreeMap::new(),
        }
    }

    /// Create a registry holding the datastore actions every app exposes
    pub fn with_builtins(app: AppInfo) -> Result<Self> {
        let mut registry = Self::new(app);
        builtin::register(&mut registry)?;
        Ok(registry)
    }

    pub fn app(&self) -> &AppInfo {
        &self.app
    }

    /// Register an action. Names must be unique and non-empty.
    pub fn register(&mut self, action: Arc<dyn Action>) -> Result<()> {
        let name = action.name().to_string();
        if name.trim().is_empty() {
            bail!("Action name must not be empty");
        }
        if self.actions.contains_key(&name) {
            bail!("Action '{}' is already registered", name);
        }

        tracing::trace!(action = %name, app = %self.app.name, "Action registered");
        self.actions.insert(name, action);
        Ok(())
    }

    /// Get an action by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Action>> {
        self.actions.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    /// Public action names, alphabetically.
    pub fn available(&self) -> Vec<String> {
        self.actions
            .keys()
            .filter(|name| !name.starts_with(PRIVATE_ACTION_PREFIX))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl std::fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("app", &self.app.name)
            .field("actions", &self.actions.keys().collect::<Vec<_>>())
            .finish()
    }
}
