//! Storage capability trait
//!
//! Actions only see this trait. The S3 implementation lives in `s3`; tests
//! provide in-memory doubles.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

use crate::credentials::S3Credentials;
use crate::errors::friendly_message;
use crate::types::{
    BucketMetadataKind, BucketSummary, CannedAcl, CreatedBucket, DeletedObject, StoredObject,
    WrittenObject,
};

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// The service answered with an error code.
    #[error("{}", describe_service_error(.code, .message))]
    Service { code: String, message: String },

    /// The request never produced a service answer (network, timeout, ...).
    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl StorageError {
    pub fn service(code: impl Into<String>, message: impl Into<String>) -> Self {
        StorageError::Service {
            code: code.into(),
            message: message.into(),
        }
    }

    /// The service error code, if the service answered.
    pub fn code(&self) -> Option<&str> {
        match self {
            StorageError::Service { code, .. } => Some(code),
            _ => None,
        }
    }

    pub fn is_code(&self, expected: &str) -> bool {
        self.code() == Some(expected)
    }
}

fn describe_service_error(code: &str, message: &str) -> String {
    match friendly_message(code) {
        Some(friendly) if message.is_empty() => format!("{} ({})", friendly, code),
        Some(friendly) => format!("{} ({}): {}", friendly, code, message),
        None if message.is_empty() => code.to_string(),
        None => format!("{}: {}", code, message),
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Cloud object storage capability.
#[async_trait]
pub trait ObjectStorageClient: Send + Sync {
    async fn list_buckets(&self) -> StorageResult<BucketSummary>;

    /// Create a bucket. `location` is the location constraint, if any.
    async fn create_bucket(
        &self,
        bucket: &str,
        acl: Option<CannedAcl>,
        location: Option<&str>,
    ) -> StorageResult<CreatedBucket>;

    async fn put_object(&self, bucket: &str, key: &str, data: Vec<u8>)
        -> StorageResult<WrittenObject>;

    async fn get_object(&self, bucket: &str, key: &str) -> StorageResult<StoredObject>;

    async fn delete_object(&self, bucket: &str, key: &str) -> StorageResult<DeletedObject>;

    /// The bucket policy document, or `None` when the bucket has no policy.
    async fn get_bucket_policy(&self, bucket: &str) -> StorageResult<Option<String>>;

    async fn put_bucket_policy(&self, bucket: &str, policy: &str) -> StorageResult<()>;

    async fn get_bucket_metadata(
        &self,
        bucket: &str,
        kind: BucketMetadataKind,
    ) -> StorageResult<Value>;
}

/// Builds an authenticated client from explicit credentials.
#[async_trait]
pub trait StorageConnector: Send + Sync {
    async fn connect(&self, credentials: &S3Credentials)
        -> StorageResult<Arc<dyn ObjectStorageClient>>;
}
