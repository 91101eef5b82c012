//! Test helpers for action unit tests
//!
//! Provides an in-memory storage capability so the storage action set can be
//! exercised without a network.

pub mod mock_storage;

pub use mock_storage::{MockConnector, MockStorage};

use appkit_infra::Datastore;

use crate::action::{ActionContext, AppInfo};

/// Context with a local-only datastore.
pub fn test_context() -> ActionContext {
    ActionContext::new(
        AppInfo::new("test-app", "1.0.0", "App used in unit tests"),
        "test-execution",
        Datastore::new(),
    )
}
