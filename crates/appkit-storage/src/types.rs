//! Values exchanged with an `ObjectStorageClient`.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::traits::StorageError;

/// Canned ACL applied when creating a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CannedAcl {
    Private,
    PublicRead,
    PublicReadWrite,
    AuthenticatedRead,
}

impl CannedAcl {
    pub fn as_str(&self) -> &'static str {
        match self {
            CannedAcl::Private => "private",
            CannedAcl::PublicRead => "public-read",
            CannedAcl::PublicReadWrite => "public-read-write",
            CannedAcl::AuthenticatedRead => "authenticated-read",
        }
    }

    /// Translate a canned or human-readable ACL name.
    ///
    /// Accepts `public-read`, `Public Read`, `public_read` and so on,
    /// case-insensitively.
    pub fn parse(name: &str) -> Result<Self, StorageError> {
        let normalized: String = name
            .trim()
            .to_ascii_lowercase()
            .chars()
            .map(|c| if c == ' ' || c == '_' { '-' } else { c })
            .collect();

        match normalized.as_str() {
            "private" => Ok(CannedAcl::Private),
            "public-read" | "public" => Ok(CannedAcl::PublicRead),
            "public-read-write" => Ok(CannedAcl::PublicReadWrite),
            "authenticated-read" => Ok(CannedAcl::AuthenticatedRead),
            _ => Err(StorageError::InvalidInput(format!(
                "Unknown access type '{}'. Expected one of: private, public-read, \
                 public-read-write, authenticated-read",
                name
            ))),
        }
    }
}

impl FromStr for CannedAcl {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for CannedAcl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bucket configuration that can be read back as metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketMetadataKind {
    RequestPayment,
    Replication,
    PolicyStatus,
    Logging,
}

impl BucketMetadataKind {
    pub fn operation(&self) -> &'static str {
        match self {
            BucketMetadataKind::RequestPayment => "GetBucketRequestPayment",
            BucketMetadataKind::Replication => "GetBucketReplication",
            BucketMetadataKind::PolicyStatus => "GetBucketPolicyStatus",
            BucketMetadataKind::Logging => "GetBucketLogging",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketInfo {
    pub name: String,
    /// RFC 3339 timestamp, when the service reports one.
    pub creation_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketOwner {
    pub id: Option<String>,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketSummary {
    pub buckets: Vec<BucketInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<BucketOwner>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedBucket {
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenObject {
    pub e_tag: Option<String>,
    pub version_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletedObject {
    pub delete_marker: Option<bool>,
    pub version_id: Option<String>,
}

/// Object body and the metadata returned with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub data: Vec<u8>,
    pub content_type: Option<String>,
    pub e_tag: Option<String>,
}
