use appkit_core::{ActionParams, ActionResult, Payload};
use appkit_storage::{BucketMetadataKind, CannedAcl, StorageConnector};
use async_trait::async_trait;
use serde_json::json;
use std::fmt;
use std::sync::Arc;

use super::{connect, s3_params, storage_error};
use crate::action::{payload, Action, ActionContext};

/// Region where S3 rejects an explicit location constraint.
const DEFAULT_REGION: &str = "us-east-1";

s3_params!(ConnectionParams {});

s3_params!(CreateBucketParams {
    bucket_name: String,
    access_type: String,
});

s3_params!(BucketParams { bucket_name: String });

pub struct ListBuckets {
    connector: Arc<dyn StorageConnector>,
}

impl ListBuckets {
    pub fn new(connector: Arc<dyn StorageConnector>) -> Self {
        Self { connector }
    }
}

impl fmt::Debug for ListBuckets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListBuckets").finish()
    }
}

#[async_trait]
impl Action for ListBuckets {
    fn name(&self) -> &str {
        "list_buckets"
    }

    fn description(&self) -> &str {
        "List all buckets"
    }

    async fn execute(

        &self,

        _context: &ActionContext,

        params: ActionParams,

    ) -> ActionResult<Payload> {
        let params: ConnectionParams = params.parse()?;
        let client = connect(&self.connector, &params.credentials()).await?;
        let summary = client.list_buckets().await.map_err(storage_error)?;

        let mut out = payload(json!({ "buckets": summary.buckets }));
        if let Some(owner) = summary.owner {
            out.insert("owner".to_string(), json!(owner));
        }
        Ok(out)
    }
}

pub struct CreateBucket {
    connector: Arc<dyn StorageConnector>,
}

impl CreateBucket {
    pub fn new(connector: Arc<dyn StorageConnector>) -> Self {
        Self { connector }
    }
}

impl fmt::Debug for CreateBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateBucket").finish()
    }
}

#[async_trait]
impl Action for CreateBucket {
    fn name(&self) -> &str {
        "create_bucket"
    }

    fn description(&self) -> &str {
        "Create a bucket with a canned ACL"
    }

    async fn execute(

        &self,

        _context: &ActionContext,

        params: ActionParams,

    ) -> ActionResult<Payload> {
        let params: CreateBucketParams = params.parse()?;
        let acl = CannedAcl::parse(&params.access_type).map_err(storage_error)?;
        let credentials = params.credentials();

        // MinIO and us-east-1 take no location constraint.
        let location = if credentials.is_custom_endpoint() || params.region == DEFAULT_REGION {
            None
        } else {
            Some(params.region.as_str())
        };

        let client = connect(&self.connector, &credentials).await?;
        let created = client
            .create_bucket(&params.bucket_name, Some(acl), location)
            .await
            .map_err(storage_error)?;

        Ok(payload(json!({
            "bucket_name": params.bucket_name,
            "access_type": acl,
            "result": created,
        })))
    }
}

/// Reads one kind of bucket configuration.
pub struct BucketMetadataAction {
    name: &'static str,
    description: &'static str,
    kind: BucketMetadataKind,
    connector: Arc<dyn StorageConnector>,
}

impl BucketMetadataAction {
    pub fn new(kind: BucketMetadataKind, connector: Arc<dyn StorageConnector>) -> Self {
        let (name, description) = match kind {
            BucketMetadataKind::RequestPayment => (
                "bucket_request_payment",
                "Get the bucket request payment configuration",
            ),
            BucketMetadataKind::Replication => (
                "bucket_replication",
                "Get the bucket replication configuration",
            ),
            BucketMetadataKind::PolicyStatus => {
                ("bucket_policy_status", "Get whether the bucket is public")
            }
            BucketMetadataKind::Logging => {
                ("bucket_logging", "Get the bucket logging configuration")
            }
        };
        Self {
            name,
            description,
            kind,
            connector,
        }
    }

    /// One action per metadata kind.
    pub fn all(connector: Arc<dyn StorageConnector>) -> Vec<Self> {
        [
            BucketMetadataKind::RequestPayment,
            BucketMetadataKind::Replication,
            BucketMetadataKind::PolicyStatus,
            BucketMetadataKind::Logging,
        ]
        .into_iter()
        .map(|kind| Self::new(kind, connector.clone()))
        .collect()
    }
}

impl fmt::Debug for BucketMetadataAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BucketMetadataAction")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

#[async_trait]
impl Action for BucketMetadataAction {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        self.description
    }

    async fn execute(

        &self,

        _context: &ActionContext,

        params: ActionParams,

    ) -> ActionResult<Payload> {
        let params: BucketParams = params.parse()?;
        let client = connect(&self.connector, &params.credentials()).await?;
        let metadata = client
            .get_bucket_metadata(&params.bucket_name, self.kind)
            .await
            .map_err(storage_error)?;

        Ok(payload(json!({
            "bucket_name": params.bucket_name,
            "result": metadata,
        })))
    }
}
