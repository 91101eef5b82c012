//! Best-effort remote copy of datastore writes.

use appkit_core::MirrorTarget;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("Failed to encode value for key '{key}': {reason}")]
    Encode { key: String, reason: String },

    #[error("Mirror request failed: {0}")]
    Request(String),

    #[error("Mirror rejected write with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Destination for datastore writes beyond the local map.
#[async_trait]
pub trait DatastoreMirror: Send + Sync {
    async fn mirror(&self, key: &str, value: &Value) -> Result<(), MirrorError>;
}

/// Mirrors writes to the backend over HTTP.
#[derive(Clone, Debug)]
pub struct HttpMirror {
    client: Client,
    url: String,
    authorization: String,
}

impl HttpMirror {
    pub fn new(target: MirrorTarget, timeout: Duration) -> Result<Self, MirrorError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| MirrorError::Client(e.to_string()))?;

        Ok(Self {
            client,
            url: target.url,
            authorization: target.authorization,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn authorization_header(&self) -> String {
        if self.authorization.starts_with("Bearer ") {
            self.authorization.clone()
        } else {
            format!("Bearer {}", self.authorization)
        }
    }
}

#[async_trait]
impl DatastoreMirror for HttpMirror {
    async fn mirror(&self, key: &str, value: &Value) -> Result<(), MirrorError> {
        // The backend expects the value itself as a JSON-encoded string.
        let encoded = serde_json::to_string(value).map_err(|e| MirrorError::Encode {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        let body = serde_json::json!({ "key": key, "value": encoded });

        let response = self
            .client
            .post(&self.url)
            .header("Authorization", self.authorization_header())
            .json(&body)
            .send()
            .await
            .map_err(|e| MirrorError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(MirrorError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn mirror_for(server: &mockito::ServerGuard, token: &str) -> HttpMirror {
        HttpMirror::new(
            MirrorTarget {
                url: format!("{}/api/v1/apps/datastore", server.url()),
                authorization: token.to_string(),
            },
            Duration::from_secs(2),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_mirror_posts_encoded_value() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v1/apps/datastore")
            .match_header("authorization", "Bearer secret-token")
            .match_body(Matcher::Json(json!({
                "key": "k1",
                "value": "{\"count\":3}"
            })))
            .with_status(200)
            .with_body("{\"success\": true}")
            .create_async()
            .await;

        let mirror = mirror_for(&server, "secret-token");
        mirror.mirror("k1", &json!({"count": 3})).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_mirror_keeps_existing_bearer_scheme() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v1/apps/datastore")
            .match_header("authorization", "Bearer abc")
            .with_status(200)
            .create_async()
            .await;

        let mirror = mirror_for(&server, "Bearer abc");
        mirror.mirror("k", &json!(1)).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_mirror_rejected_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/v1/apps/datastore")
            .with_status(401)
            .with_body("unauthorized")
            .create_async()
            .await;

        let mirror = mirror_for(&server, "bad");
        let err = mirror.mirror("k", &json!("v")).await.unwrap_err();
        match err {
            MirrorError::Rejected { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "unauthorized");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
