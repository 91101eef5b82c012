//! Key/value datastore for actions.
//!
//! Values live in process memory for the lifetime of one invocation. When a
//! mirror is configured, every write is also sent to it on a best-effort
//! basis: a mirror failure is logged and never changes what `set` or `get`
//! observe. Reads are always served locally.

mod mirror;

pub use mirror::{DatastoreMirror, HttpMirror, MirrorError};

use appkit_core::RunnerConfig;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// What happened to a write beyond the local store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MirrorStatus {
    /// No mirror is configured.
    LocalOnly,
    /// The mirror accepted the write.
    Mirrored,
    /// The mirror write failed; the local write still happened.
    MirrorFailed,
}

impl MirrorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MirrorStatus::LocalOnly => "local_only",
            MirrorStatus::Mirrored => "mirrored",
            MirrorStatus::MirrorFailed => "mirror_failed",
        }
    }
}

#[derive(Clone, Default)]
pub struct Datastore {
    entries: Arc<RwLock<HashMap<String, Value>>>,
    mirror: Option<Arc<dyn DatastoreMirror>>,
}

impl std::fmt::Debug for Datastore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Datastore")
            .field("mirrored", &self.mirror.is_some())
            .finish()
    }
}

impl Datastore {
    /// Create a local-only datastore
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mirror(mirror: Arc<dyn DatastoreMirror>) -> Self {
        Self {
            entries: Arc::default(),
            mirror: Some(mirror),
        }
    }

    /// Build the datastore for this process, mirroring when the config allows it.
    pub fn from_config(config: &RunnerConfig) -> Self {
        let Some(target) = config.mirror_target() else {
            return Self::new();
        };

        match HttpMirror::new(target, config.datastore_timeout()) {
            Ok(mirror) => {
                tracing::debug!(url = %mirror.url(), "Datastore mirror enabled");
                Self::with_mirror(Arc::new(mirror))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Datastore mirror unavailable, using local store only");
                Self::new()
            }
        }
    }

    pub fn is_mirrored(&self) -> bool {
        self.mirror.is_some()
    }

    /// Store a value, overwriting any previous one.
    pub async fn set(&self, key: impl Into<String>, value: Value) -> MirrorStatus {
        let key = key.into();
        self.entries
            .write()
            .await
            .insert(key.clone(), value.clone());

        let Some(mirror) = &self.mirror else {
            return MirrorStatus::LocalOnly;
        };

        match mirror.mirror(&key, &value).await {
            Ok(()) => MirrorStatus::Mirrored,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Could not mirror datastore key");
                MirrorStatus::MirrorFailed
            }
        }
    }

    pub async fn get(&self, key: &str) -> Option<Value> {
        self.entries.read().await.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Default)]
    struct CountingMirror {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl DatastoreMirror for CountingMirror {
        async fn mirror(&self, _key: &str, _value: &Value) -> Result<(), MirrorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct FailingMirror;

    #[async_trait]
    impl DatastoreMirror for FailingMirror {
        async fn mirror(&self, _key: &str, _value: &Value) -> Result<(), MirrorError> {
            Err(MirrorError::Request("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_set_then_get_local() {
        let store = Datastore::new();
        assert!(store.is_empty().await);

        let status = store.set("k", json!({"a": 1})).await;
        assert_eq!(status, MirrorStatus::LocalOnly);
        assert_eq!(store.get("k").await, Some(json!({"a": 1})));
        assert_eq!(store.get("missing").await, None);
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let store = Datastore::new();
        store.set("k", json!(1)).await;
        store.set("k", json!(2)).await;
        assert_eq!(store.get("k").await, Some(json!(2)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_mirror_called_on_set() {
        let mirror = Arc::new(CountingMirror::default());
        let store = Datastore::with_mirror(mirror.clone());

        assert_eq!(store.set("a", json!("x")).await, MirrorStatus::Mirrored);
        assert_eq!(store.set("b", json!("y")).await, MirrorStatus::Mirrored);
        assert_eq!(mirror.calls.load(Ordering::SeqCst), 2);

        // Reads never reach the mirror.
        store.get("a").await;
        assert_eq!(mirror.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_mirror_failure_keeps_local_value() {
        let store = Datastore::with_mirror(Arc::new(FailingMirror));

        let status = store.set("k", json!({"message": "hello"})).await;
        assert_eq!(status, MirrorStatus::MirrorFailed);
        assert_eq!(store.get("k").await, Some(json!({"message": "hello"})));
    }

    #[tokio::test]
    async fn test_unreachable_http_mirror_does_not_fail_set() {
        let mirror = HttpMirror::new(
            appkit_core::MirrorTarget {
                url: "http://127.0.0.1:9/api/v1/apps/datastore".to_string(),
                authorization: "token".to_string(),
            },
            Duration::from_secs(1),
        )
        .unwrap();
        let store = Datastore::with_mirror(Arc::new(mirror));

        assert_eq!(store.set("k", json!(true)).await, MirrorStatus::MirrorFailed);
        assert_eq!(store.get("k").await, Some(json!(true)));
    }

    #[tokio::test]
    async fn test_from_config() {
        let local = RunnerConfig::from_lookup(|_| None);
        assert!(!Datastore::from_config(&local).is_mirrored());

        let mirrored = RunnerConfig::from_lookup(|name| match name {
            "BASE_URL" => Some("http://backend:5001".to_string()),
            "AUTHORIZATION" => Some("token".to_string()),
            _ => None,
        });
        assert!(Datastore::from_config(&mirrored).is_mirrored());
    }

    #[tokio::test]
    async fn test_silent_http_mirror_is_bounded_by_timeout() {
        // Accepts connections and never answers.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let acceptor = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let timeout = Duration::from_secs(1);
        let mirror = HttpMirror::new(
            appkit_core::MirrorTarget {
                url: format!("http://{}/api/v1/apps/datastore", addr),
                authorization: "token".to_string(),
            },
            timeout,
        )
        .unwrap();
        let store = Datastore::with_mirror(Arc::new(mirror));

        let started = std::time::Instant::now();
        let status = store.set("k", json!({"n": 1})).await;
        let elapsed = started.elapsed();

        assert_eq!(status, MirrorStatus::MirrorFailed);
        assert!(elapsed >= timeout, "returned before the timeout: {:?}", elapsed);
        assert!(elapsed < timeout + Duration::from_secs(2), "took {:?}", elapsed);
        assert_eq!(store.get("k").await, Some(json!({"n": 1})));

        acceptor.abort();
    }

    #[test]
    fn test_mirror_status_names() {
        assert_eq!(MirrorStatus::MirrorFailed.as_str(), "mirror_failed");
        assert_eq!(
            serde_json::to_value(MirrorStatus::LocalOnly).unwrap(),
            json!("local_only")
        );
    }
}
