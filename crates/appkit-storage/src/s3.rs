use crate::credentials::S3Credentials;
use crate::traits::{ObjectStorageClient, StorageConnector, StorageError, StorageResult};
use crate::types::{
    BucketInfo, BucketMetadataKind, BucketOwner, BucketSummary, CannedAcl, CreatedBucket,
    DeletedObject, StoredObject, WrittenObject,
};
use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::primitives::{ByteStream, DateTimeFormat};
use aws_sdk_s3::types::{BucketCannedAcl, BucketLocationConstraint, CreateBucketConfiguration};
use aws_sdk_s3::Client;
use serde_json::{json, Value};
use std::sync::Arc;

/// Attempts per request, including the first one.
const MAX_ATTEMPTS: u32 = 10;

/// Name reported for credentials taken from action parameters.
const CREDENTIALS_PROVIDER_NAME: &str = "appkit-action-params";

/// S3 client implementation
#[derive(Clone, Debug)]
pub struct S3Client {
    client: Client,
}

impl S3Client {
    /// Authenticate a new client from explicit credentials.
    ///
    /// A custom endpoint (MinIO and other S3-compatible providers) switches
    /// to path-style addressing.
    pub async fn connect(credentials: &S3Credentials) -> StorageResult<Self> {
        if credentials.access_key.trim().is_empty() || credentials.secret_key.trim().is_empty() {
            return Err(StorageError::ConfigError(
                "access_key and secret_key are required".to_string(),
            ));
        }
        if credentials.region.trim().is_empty() {
            return Err(StorageError::ConfigError("region is required".to_string()));
        }

        let retry_config = RetryConfig::standard().with_max_attempts(MAX_ATTEMPTS);

        let static_credentials = Credentials::new(
            credentials.access_key.clone(),
            credentials.secret_key.clone(),
            None,
            None,
            CREDENTIALS_PROVIDER_NAME,
        );

        let shared_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(credentials.region.clone()))
            .credentials_provider(static_credentials)
            .retry_config(retry_config)
            .load()
            .await;

        let mut s3_config_builder = aws_sdk_s3::config::Builder::from(&shared_config);
        if let Some(endpoint) = credentials.endpoint() {
            s3_config_builder = s3_config_builder
                .endpoint_url(endpoint)
                .force_path_style(true);
        }

        tracing::debug!(
            region = %credentials.region,
            endpoint = credentials.endpoint().unwrap_or("aws"),
            "S3 client configured"
        );

        Ok(Self {
            client: Client::from_conf(s3_config_builder.build()),
        })
    }
}

/// Map an SDK failure onto `StorageError`, keeping the service error code.
fn map_sdk_error<E, R>(err: SdkError<E, R>) -> StorageError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    if let Some(service_error) = err.as_service_error() {
        if let Some(code) = service_error.code() {
            return StorageError::service(code, service_error.message().unwrap_or_default());
        }
    }
    StorageError::Backend(DisplayErrorContext(&err).to_string())
}

fn log_failure(operation: &str, bucket: &str, err: &StorageError, start: std::time::Instant) {
    tracing::error!(
        error = %err,
        operation = operation,
        bucket = %bucket,
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "S3 request failed"
    );
}

#[async_trait]
impl ObjectStorageClient for S3Client {
    async fn list_buckets(&self) -> StorageResult<BucketSummary> {
        let start = std::time::Instant::now();
        let output = self
            .client
            .list_buckets()
            .send()
            .await
            .map_err(map_sdk_error)
            .inspect_err(|e| log_failure("ListBuckets", "*", e, start))?;

        let buckets = output
            .buckets()
            .iter()
            .map(|bucket| BucketInfo {
                name: bucket.name().unwrap_or_default().to_string(),
                creation_date: bucket
                    .creation_date()
                    .and_then(|d| d.fmt(DateTimeFormat::DateTime).ok()),
            })
            .collect::<Vec<_>>();

        let owner = output.owner().map(|owner| BucketOwner {
            id: owner.id().map(String::from),
            display_name: owner.display_name().map(String::from),
        });

        tracing::info!(
            count = buckets.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 list buckets successful"
        );

        Ok(BucketSummary { buckets, owner })
    }

    async fn create_bucket(
        &self,
        bucket: &str,
        acl: Option<CannedAcl>,
        location: Option<&str>,
    ) -> StorageResult<CreatedBucket> {
        let start = std::time::Instant::now();
        let mut request = self.client.create_bucket().bucket(bucket);
        if let Some(acl) = acl {
            request = request.acl(BucketCannedAcl::from(acl.as_str()));
        }
        if let Some(location) = location {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(location))
                    .build(),
            );
        }

        let output = request
            .send()
            .await
            .map_err(map_sdk_error)
            .inspect_err(|e| log_failure("CreateBucket", bucket, e, start))?;

        tracing::info!(
            bucket = %bucket,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 create bucket successful"
        );

        Ok(CreatedBucket {
            location: output.location().map(String::from),
        })
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
    ) -> StorageResult<WrittenObject> {
        let start = std::time::Instant::now();
        let size = data.len() as u64;

        let output = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(map_sdk_error)
            .inspect_err(|e| log_failure("PutObject", bucket, e, start))?;

        tracing::info!(
            bucket = %bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(WrittenObject {
            e_tag: output.e_tag().map(String::from),
            version_id: output.version_id().map(String::from),
        })
    }

    async fn get_object(&self, bucket: &str, key: &str) -> StorageResult<StoredObject> {
        let start = std::time::Instant::now();

        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(map_sdk_error)
            .inspect_err(|e| log_failure("GetObject", bucket, e, start))?;

        let content_type = output.content_type().map(String::from);
        let e_tag = output.e_tag().map(String::from);
        let data = output
            .body
            .collect()
            .await
            .map_err(|e| StorageError::Backend(format!("Failed to read object body: {}", e)))?
            .into_bytes()
            .to_vec();

        tracing::info!(
            bucket = %bucket,
            key = %key,
            size_bytes = data.len() as u64,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 download successful"
        );

        Ok(StoredObject {
            data,
            content_type,
            e_tag,
        })
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> StorageResult<DeletedObject> {
        let start = std::time::Instant::now();

        let output = self
            .client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(map_sdk_error)
            .inspect_err(|e| log_failure("DeleteObject", bucket, e, start))?;

        tracing::info!(
            bucket = %bucket,
            key = %key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 delete successful"
        );

        Ok(DeletedObject {
            delete_marker: output.delete_marker(),
            version_id: output.version_id().map(String::from),
        })
    }

    async fn get_bucket_policy(&self, bucket: &str) -> StorageResult<Option<String>> {
        let start = std::time::Instant::now();

        match self.client.get_bucket_policy().bucket(bucket).send().await {
            Ok(output) => Ok(output.policy().map(String::from)),
            Err(e) => {
                let err = map_sdk_error(e);
                if err.is_code("NoSuchBucketPolicy") {
                    tracing::debug!(bucket = %bucket, "Bucket has no policy");
                    return Ok(None);
                }
                log_failure("GetBucketPolicy", bucket, &err, start);
                Err(err)
            }
        }
    }

    async fn put_bucket_policy(&self, bucket: &str, policy: &str) -> StorageResult<()> {
        let start = std::time::Instant::now();

        self.client
            .put_bucket_policy()
            .bucket(bucket)
            .policy(policy)
            .send()
            .await
            .map_err(map_sdk_error)
            .inspect_err(|e| log_failure("PutBucketPolicy", bucket, e, start))?;

        tracing::info!(
            bucket = %bucket,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 put bucket policy successful"
        );

        Ok(())
    }

    async fn get_bucket_metadata(
        &self,
        bucket: &str,
        kind: BucketMetadataKind,
    ) -> StorageResult<Value> {
        let start = std::time::Instant::now();

        let result = match kind {
            BucketMetadataKind::RequestPayment => self
                .client
                .get_bucket_request_payment()
                .bucket(bucket)
                .send()
                .await
                .map(|output| json!({ "payer": output.payer().map(|p| p.as_str()) }))
                .map_err(map_sdk_error),
            BucketMetadataKind::Replication => self
                .client
                .get_bucket_replication()
                .bucket(bucket)
                .send()
                .await
                .map(|output| match output.replication_configuration() {
                    Some(config) => json!({
                        "role": config.role(),
                        "rules": config
                            .rules()
                            .iter()
                            .map(|rule| json!({
                                "id": rule.id(),
                                "priority": rule.priority(),
                                "status": rule.status().as_str(),
                                "destination_bucket": rule.destination().map(|d| d.bucket()),
                            }))
                            .collect::<Vec<_>>(),
                    }),
                    None => Value::Null,
                })
                .map_err(map_sdk_error),
            BucketMetadataKind::PolicyStatus => self
                .client
                .get_bucket_policy_status()
                .bucket(bucket)
                .send()
                .await
                .map(|output| {
                    json!({
                        "is_public": output.policy_status().and_then(|s| s.is_public()),
                    })
                })
                .map_err(map_sdk_error),
            BucketMetadataKind::Logging => self
                .client
                .get_bucket_logging()
                .bucket(bucket)
                .send()
                .await
                .map(|output| match output.logging_enabled() {
                    Some(logging) => json!({
                        "enabled": true,
                        "target_bucket": logging.target_bucket(),
                        "target_prefix": logging.target_prefix(),
                    }),
                    None => json!({ "enabled": false }),
                })
                .map_err(map_sdk_error),
        };

        match result {
            Ok(value) => {
                tracing::info!(
                    bucket = %bucket,
                    operation = kind.operation(),
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 bucket metadata retrieved"
                );
                Ok(value)
            }
            Err(err) => {
                log_failure(kind.operation(), bucket, &err, start);
                Err(err)
            }
        }
    }
}

/// Connects real S3 clients, one per invocation.
#[derive(Clone, Copy, Debug, Default)]
pub struct S3Connector;

#[async_trait]
impl StorageConnector for S3Connector {
    async fn connect(
        &self,
        credentials: &S3Credentials,
    ) -> StorageResult<Arc<dyn ObjectStorageClient>> {
        let client = S3Client::connect(credentials).await?;
        Ok(Arc::new(client))
    }
}
