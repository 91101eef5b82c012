//! Actions and the apps built from them
//!
//! Every app is an `ActionRegistry`: the datastore built-ins plus the app's
//! own actions. The `test_app` set exercises the runner and datastore; the
//! `s3` set manages S3 and MinIO buckets and objects.

pub mod action;
mod builtin;
pub mod registry;
pub mod s3;
#[cfg(feature = "app-test")]
pub mod test_app;

#[cfg(test)]
pub mod test_helpers;

pub use action::{Action, ActionContext, AppInfo};
pub use builtin::{GetDatastoreKey, SetDatastoreKey};
pub use registry::ActionRegistry;
