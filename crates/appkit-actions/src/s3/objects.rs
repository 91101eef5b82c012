use appkit_core::{ActionError, ActionParams, ActionResult, Payload};
use appkit_storage::StorageConnector;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;
use serde_json::json;
use std::fmt;
use std::sync::Arc;

use super::{connect, s3_params, storage_error};
use crate::action::{payload, Action, ActionContext};

/// How the `content` parameter of an upload is encoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ContentEncoding {
    #[default]
    Utf8,
    Base64,
}

s3_params!(UploadParams {
    bucket_name: String,
    bucket_path: String,
    content: String,
    #[serde(default)]
    encoding: ContentEncoding,
});

s3_params!(DeleteParams {
    bucket_name: String,
    bucket_path: String,
});

s3_params!(DownloadParams {
    bucket_name: String,
    filename: String,
});

pub struct UploadFile {
    connector: Arc<dyn StorageConnector>,
}

impl UploadFile {
    pub fn new(connector: Arc<dyn StorageConnector>) -> Self {
        Self { connector }
    }
}

impl fmt::Debug for UploadFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadFile").finish()
    }
}

#[async_trait]
impl Action for UploadFile {
    fn name(&self) -> &str {
        "upload_file_to_bucket"
    }

    fn description(&self) -> &str {
        "Write content to an object key"
    }

    async fn execute(

        &self,

        _context: &ActionContext,

        params: ActionParams,

    ) -> ActionResult<Payload> {
        let params: UploadParams = params.parse()?;
        let data = match params.encoding {
            ContentEncoding::Utf8 => params.content.clone().into_bytes(),
            ContentEncoding::Base64 => BASE64.decode(params.content.trim()).map_err(|e| {
                ActionError::invalid_params(format!("content is not valid base64: {}", e))
            })?,
        };
        let length = data.len();

        let client = connect(&self.connector, &params.credentials()).await?;
        let written = client
            .put_object(&params.bucket_name, &params.bucket_path, data)
            .await
            .map_err(storage_error)?;

        Ok(payload(json!({
            "bucket_name": params.bucket_name,
            "bucket_path": params.bucket_path,
            "length": length,
            "result": written,
        })))
    }
}

pub struct DeleteFile {
    connector: Arc<dyn StorageConnector>,
}

impl DeleteFile {
    pub fn new(connector: Arc<dyn StorageConnector>) -> Self {
        Self { connector }
    }
}

impl fmt::Debug for DeleteFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeleteFile").finish()
    }
}

#[async_trait]
impl Action for DeleteFile {
    fn name(&self) -> &str {
        "delete_file_from_bucket"
    }

    fn description(&self) -> &str {
        "Delete an object key"
    }

    async fn execute(

        &self,

        _context: &ActionContext,

        params: ActionParams,

    ) -> ActionResult<Payload> {
        let params: DeleteParams = params.parse()?;
        let client = connect(&self.connector, &params.credentials()).await?;
        let deleted = client
            .delete_object(&params.bucket_name, &params.bucket_path)
            .await
            .map_err(storage_error)?;

        Ok(payload(json!({
            "bucket_name": params.bucket_name,
            "bucket_path": params.bucket_path,
            "result": deleted,
        })))
    }
}

pub struct DownloadFile {
    connector: Arc<dyn StorageConnector>,
}

impl DownloadFile {
    pub fn new(connector: Arc<dyn StorageConnector>) -> Self {
        Self { connector }
    }
}

impl fmt::Debug for DownloadFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DownloadFile").finish()
    }
}

#[async_trait]
impl Action for DownloadFile {
    fn name(&self) -> &str {
        "download_file_from_bucket"
    }

    fn description(&self) -> &str {
        "Read an object and record it in the datastore"
    }

    async fn execute(

        &self,

        context: &ActionContext,

        params: ActionParams,

    ) -> ActionResult<Payload> {
        let params: DownloadParams = params.parse()?;
        let client = connect(&self.connector, &params.credentials()).await?;
        let object = client
            .get_object(&params.bucket_name, &params.filename)
            .await
            .map_err(storage_error)?;
        let length = object.data.len();

        let mirror = context
            .datastore
            .set(
                format!("file_{}", params.filename),
                json!({
                    "filename": params.filename,
                    "bucket": params.bucket_name,
                    "length": length,
                }),
            )
            .await;

        let mut out = payload(json!({
            "filename": params.filename,
            "bucket_name": params.bucket_name,
            "length": length,
            "content_type": object.content_type,
            "datastore": mirror,
        }));
        match String::from_utf8(object.data) {
            Ok(text) => {
                out.insert("content".to_string(), json!(text));
            }
            Err(e) => {
                out.insert(
                    "content_base64".to_string(),
                    json!(BASE64.encode(e.into_bytes())),
                );
            }
        }
        Ok(out)
    }
}
