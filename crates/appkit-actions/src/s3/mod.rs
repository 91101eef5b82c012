//! S3 / MinIO action set
//!
//! Every action authenticates a fresh client from the credentials in its own
//! parameters, performs one storage call and returns a JSON payload. Storage
//! errors arrive already enriched with a friendly description of the S3
//! error code.

mod buckets;
mod objects;
mod policy;

use anyhow::Result;
use appkit_core::{ActionError, ActionResult};
use appkit_storage::{ObjectStorageClient, S3Credentials, StorageConnector, StorageError};
use std::sync::Arc;

use crate::action::AppInfo;
use crate::registry::ActionRegistry;

pub use buckets::{BucketMetadataAction, CreateBucket, ListBuckets};
pub use objects::{DeleteFile, DownloadFile, UploadFile};
pub use policy::{add_ip_deny_statement, BlockIpAccess};

pub const APP_NAME: &str = "aws-s3";
pub const APP_VERSION: &str = "1.0.0";

/// Registry for the S3 app, connecting real S3 clients.
#[cfg(feature = "app-aws-s3")]
pub fn registry() -> Result<ActionRegistry> {
    registry_with(Arc::new(appkit_storage::S3Connector))
}

/// Registry for the S3 app using the given connector.
pub fn registry_with(connector: Arc<dyn StorageConnector>) -> Result<ActionRegistry> {
    let mut registry = ActionRegistry::with_builtins(AppInfo::new(
        APP_NAME,
        APP_VERSION,
        "S3 and MinIO bucket and object operations",
    ))?;
    register(&mut registry, connector)?;
    Ok(registry)
}

pub fn register(registry: &mut ActionRegistry, connector: Arc<dyn StorageConnector>) -> Result<()> {
    registry.register(Arc::new(ListBuckets::new(connector.clone())))?;
    registry.register(Arc::new(CreateBucket::new(connector.clone())))?;
    registry.register(Arc::new(BlockIpAccess::new(connector.clone())))?;
    for action in BucketMetadataAction::all(connector.clone()) {
        registry.register(Arc::new(action))?;
    }
    registry.register(Arc::new(UploadFile::new(connector.clone())))?;
    registry.register(Arc::new(DeleteFile::new(connector.clone())))?;
    registry.register(Arc::new(DownloadFile::new(connector)))?;
    Ok(())
}

/// Declares a parameter struct carrying the connection fields every S3
/// action takes, followed by the action's own fields.
macro_rules! s3_params {
    ($name:ident { $($(#[$field_meta:meta])* $field:ident : $ty:ty),* $(,)? }) => {
        #[derive(serde::Deserialize)]
        #[serde(deny_unknown_fields)]
        struct $name {
            access_key: String,
            secret_key: String,
            region: String,
            #[serde(default)]
            endpoint_url: Option<String>,
            $($(#[$field_meta])* $field: $ty,)*
        }

        impl $name {
            fn credentials(&self) -> appkit_storage::S3Credentials {
                appkit_storage::S3Credentials::new(
                    self.access_key.clone(),
                    self.secret_key.clone(),
                    self.region.clone(),
                    self.endpoint_url.clone(),
                )
            }
        }
    };
}
pub(crate) use s3_params;

/// Convert a storage error into the action error reported to the caller.
pub(crate) fn storage_error(err: StorageError) -> ActionError {
    match err {
        StorageError::InvalidInput(message) => ActionError::InvalidParams(message),
        other => ActionError::Storage(other.to_string()),
    }
}

pub(crate) async fn connect(
    connector: &Arc<dyn StorageConnector>,
    credentials: &S3Credentials,
) -> ActionResult<Arc<dyn ObjectStorageClient>> {
    connector.connect(credentials).await.map_err(storage_error)
}
