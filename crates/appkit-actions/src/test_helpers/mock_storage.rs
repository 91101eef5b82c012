//! In-memory storage capability for testing

use appkit_storage::{
    BucketInfo, BucketMetadataKind, BucketSummary, CannedAcl, CreatedBucket, DeletedObject,
    ObjectStorageClient, S3Credentials, StorageConnector, StorageError, StorageResult,
    StoredObject, WrittenObject,
};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct MockBucket {
    objects: BTreeMap<String, Vec<u8>>,
    policy: Option<String>,
}

/// A `create_bucket` call as the mock saw it
#[derive(Debug, Clone, PartialEq)]
pub struct CreateCall {
    pub bucket: String,
    pub acl: Option<CannedAcl>,
    pub location: Option<String>,
}

/// Mock storage for testing without a storage service
#[derive(Clone, Default)]
pub struct MockStorage {
    buckets: Arc<Mutex<BTreeMap<String, MockBucket>>>,
    create_calls: Arc<Mutex<Vec<CreateCall>>>,
}

fn no_such_bucket() -> StorageError {
    StorageError::service("NoSuchBucket", "The specified bucket does not exist")
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_bucket(&self, bucket: &str) {
        self.buckets
            .lock()
            .unwrap()
            .entry(bucket.to_string())
            .or_default();
    }

    pub fn add_object(&self, bucket: &str, key: &str, data: &[u8]) {
        self.buckets
            .lock()
            .unwrap()
            .entry(bucket.to_string())
            .or_default()
            .objects
            .insert(key.to_string(), data.to_vec());
    }

    pub fn set_policy(&self, bucket: &str, policy: &str) {
        self.buckets
            .lock()
            .unwrap()
            .entry(bucket.to_string())
            .or_default()
            .policy = Some(policy.to_string());
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.buckets
            .lock()
            .unwrap()
            .get(bucket)
            .and_then(|b| b.objects.get(key).cloned())
    }

    pub fn policy(&self, bucket: &str) -> Option<String> {
        self.buckets
            .lock()
            .unwrap()
            .get(bucket)
            .and_then(|b| b.policy.clone())
    }

    pub fn create_calls(&self) -> Vec<CreateCall> {
        self.create_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStorageClient for MockStorage {
    async fn list_buckets(&self) -> StorageResult<BucketSummary> {
        let buckets = self
            .buckets
            .lock()
            .unwrap()
            .keys()
            .map(|name| BucketInfo {
                name: name.clone(),
                creation_date: Some("2024-01-01T00:00:00Z".to_string()),
            })
            .collect();
        Ok(BucketSummary {
            buckets,
            owner: None,
        })
    }

    async fn create_bucket(
        &self,
        bucket: &str,
        acl: Option<CannedAcl>,
        location: Option<&str>,
    ) -> StorageResult<CreatedBucket> {
        self.create_calls.lock().unwrap().push(CreateCall {
            bucket: bucket.to_string(),
            acl,
            location: location.map(String::from),
        });

        let mut buckets = self.buckets.lock().unwrap();
        if buckets.contains_key(bucket) {
            return Err(StorageError::service(
                "BucketAlreadyOwnedByYou",
                "Your previous request to create the named bucket succeeded",
            ));
        }
        buckets.insert(bucket.to_string(), MockBucket::default());
        Ok(CreatedBucket {
            location: Some(format!("/{}", bucket)),
        })
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
    ) -> StorageResult<WrittenObject> {
        let mut buckets = self.buckets.lock().unwrap();
        let entry = buckets.get_mut(bucket).ok_or_else(no_such_bucket)?;
        entry.objects.insert(key.to_string(), data);
        Ok(WrittenObject {
            e_tag: Some("\"mock-etag\"".to_string()),
            version_id: None,
        })
    }

    async fn get_object(&self, bucket: &str, key: &str) -> StorageResult<StoredObject> {
        let buckets = self.buckets.lock().unwrap();
        let entry = buckets.get(bucket).ok_or_else(no_such_bucket)?;
        let data = entry.objects.get(key).cloned().ok_or_else(|| {
            StorageError::service("NoSuchKey", "The specified key does not exist.")
        })?;
        Ok(StoredObject {
            data,
            content_type: Some("application/octet-stream".to_string()),
            e_tag: Some("\"mock-etag\"".to_string()),
        })
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> StorageResult<DeletedObject> {
        let mut buckets = self.buckets.lock().unwrap();
        let entry = buckets.get_mut(bucket).ok_or_else(no_such_bucket)?;
        entry.objects.remove(key);
        Ok(DeletedObject {
            delete_marker: None,
            version_id: None,
        })
    }

    async fn get_bucket_policy(&self, bucket: &str) -> StorageResult<Option<String>> {
        let buckets = self.buckets.lock().unwrap();
        let entry = buckets.get(bucket).ok_or_else(no_such_bucket)?;
        Ok(entry.policy.clone())
    }

    async fn put_bucket_policy(&self, bucket: &str, policy: &str) -> StorageResult<()> {
        let mut buckets = self.buckets.lock().unwrap();
        let entry = buckets.get_mut(bucket).ok_or_else(no_such_bucket)?;
        entry.policy = Some(policy.to_string());
        Ok(())
    }

    async fn get_bucket_metadata(
        &self,
        bucket: &str,
        kind: BucketMetadataKind,
    ) -> StorageResult<Value> {
        if !self.buckets.lock().unwrap().contains_key(bucket) {
            return Err(no_such_bucket());
        }
        match kind {
            BucketMetadataKind::RequestPayment => Ok(json!({ "payer": "BucketOwner" })),
            BucketMetadataKind::Replication => Err(StorageError::service(
                "ReplicationConfigurationNotFoundError",
                "The replication configuration was not found",
            )),
            BucketMetadataKind::PolicyStatus => Ok(json!({ "is_public": false })),
            BucketMetadataKind::Logging => Ok(json!({ "enabled": false })),
        }
    }
}

/// Connector handing out the same `MockStorage`, recording credentials.
#[derive(Clone, Default)]
pub struct MockConnector {
    pub storage: MockStorage,
    connections: Arc<Mutex<Vec<S3Credentials>>>,
}

impl MockConnector {
    pub fn new(storage: MockStorage) -> Self {
        Self {
            storage,
            connections: Arc::default(),
        }
    }

    pub fn connections(&self) -> Vec<S3Credentials> {
        self.connections.lock().unwrap().clone()
    }
}

#[async_trait]
impl StorageConnector for MockConnector {
    async fn connect(
        &self,
        credentials: &S3Credentials,
    ) -> StorageResult<Arc<dyn ObjectStorageClient>> {
        self.connections.lock().unwrap().push(credentials.clone());
        Ok(Arc::new(self.storage.clone()))
    }
}
