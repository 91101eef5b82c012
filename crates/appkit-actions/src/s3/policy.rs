//! Bucket policy editing.

use appkit_core::{ActionError, ActionParams, ActionResult, Payload};
use appkit_storage::StorageConnector;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;

use super::{connect, s3_params, storage_error};
use crate::action::{payload, Action, ActionContext};

const POLICY_VERSION: &str = "2012-10-17";

s3_params!(BlockIpParams {
    bucket_name: String,
    ip: String,
});

/// Check that `ip` is an address or an address with a prefix length.
fn validate_ip(ip: &str) -> ActionResult<()> {
    let invalid =
        || ActionError::invalid_params(format!("'{}' is not an IP address or CIDR range", ip));
    let (address, prefix) = match ip.split_once('/') {
        Some((address, prefix)) => (address, Some(prefix)),
        None => (ip, None),
    };
    let address: IpAddr = address.parse().map_err(|_| invalid())?;
    if let Some(prefix) = prefix {
        let bits: u8 = prefix.parse().map_err(|_| invalid())?;
        let max = if address.is_ipv4() { 32 } else { 128 };
        if bits > max {
            return Err(invalid());
        }
    }
    Ok(())
}

fn deny_statement(bucket: &str, ip: &str) -> Value {
    json!({
        "Effect": "Deny",
        "Principal": "*",
        "Action": "s3:*",
        "Resource": [
            format!("arn:aws:s3:::{}/*", bucket),
            format!("arn:aws:s3:::{}", bucket),
        ],
        "Condition": {
            "IpAddress": { "aws:SourceIp": [ip] }
        }
    })
}

/// Whether a statement already names `ip` under `IpAddress`/`aws:SourceIp`.
fn statement_blocks(statement: &Value, ip: &str) -> bool {
    match statement.pointer("/Condition/IpAddress/aws:SourceIp") {
        Some(Value::String(existing)) => existing == ip,
        Some(Value::Array(existing)) => existing.iter().any(|v| v.as_str() == Some(ip)),
        _ => false,
    }
}

/// Add a statement denying all S3 access from `ip` to a bucket policy.
///
/// `existing` is the current policy document, if the bucket has one. Fails
/// when a statement already lists the exact same address.
pub fn add_ip_deny_statement(
    existing: Option<&str>,
    bucket: &str,
    ip: &str,
) -> ActionResult<String> {
    let statement = deny_statement(bucket, ip);

    let mut policy = match existing {
        Some(document) => serde_json::from_str::<Value>(document).map_err(|e| {
            ActionError::failed(format!("Existing bucket policy is not valid JSON: {}", e))
        })?,
        None => json!({ "Version": POLICY_VERSION, "Statement": [] }),
    };
    let Some(root) = policy.as_object_mut() else {
        return Err(ActionError::failed("Existing bucket policy is not a JSON object"));
    };

    let statements = root
        .entry("Statement")
        .or_insert_with(|| Value::Array(Vec::new()));
    if !statements.is_array() {
        let single = statements.take();
        *statements = Value::Array(vec![single]);
    }
    if let Value::Array(list) = statements {
        if list.iter().any(|s| statement_blocks(s, ip)) {
            return Err(ActionError::failed(format!(
                "IP {} is already in this policy",
                ip
            )));
        }
        list.push(statement);
    }

    serde_json::to_string(&policy)
        .map_err(|e| ActionError::internal("Failed to encode bucket policy", e))
}

pub struct BlockIpAccess {
    connector: Arc<dyn StorageConnector>,
}

impl BlockIpAccess {
    pub fn new(connector: Arc<dyn StorageConnector>) -> Self {
        Self { connector }
    }
}

impl fmt::Debug for BlockIpAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockIpAccess").finish()
    }
}

#[async_trait]
impl Action for BlockIpAccess {
    fn name(&self) -> &str {
        "block_ip_access"
    }

    fn description(&self) -> &str {
        "Deny all bucket access from an IP address"
    }

    async fn execute(

        &self,

        _context: &ActionContext,

        params: ActionParams,

    ) -> ActionResult<Payload> {
        let params: BlockIpParams = params.parse()?;
        let ip = params.ip.trim();
        validate_ip(ip)?;

        let client = connect(&self.connector, &params.credentials()).await?;
        let existing = client
            .get_bucket_policy(&params.bucket_name)
            .await
            .map_err(storage_error)?;
        let updated = add_ip_deny_statement(existing.as_deref(), &params.bucket_name, ip)?;
        client
            .put_bucket_policy(&params.bucket_name, &updated)
            .await
            .map_err(storage_error)?;

        tracing::info!(bucket = %params.bucket_name, ip = %ip, "IP blocked in bucket policy");

        Ok(payload(json!({
            "bucket_name": params.bucket_name,
            "ip": ip,
            "message": format!("Successfully blocked IP {}", ip),
        })))
    }
}
