//! Appkit Storage Library
//!
//! This crate provides the cloud object storage capability used by the
//! storage action set: the `ObjectStorageClient` trait, the credentials it is
//! built from, and an S3/MinIO implementation on the AWS SDK.
//!
//! Clients are built per invocation from explicit credentials; nothing is
//! cached between calls.

pub mod credentials;
pub mod errors;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use credentials::S3Credentials;
pub use errors::friendly_message;
#[cfg(feature = "storage-s3")]
pub use s3::{S3Client, S3Connector};
pub use traits::{ObjectStorageClient, StorageConnector, StorageError, StorageResult};
pub use types::{
    BucketInfo, BucketMetadataKind, BucketOwner, BucketSummary, CannedAcl, CreatedBucket,
    DeletedObject, StoredObject, WrittenObject,
};
