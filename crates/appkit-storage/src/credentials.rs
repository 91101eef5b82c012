use serde::Deserialize;
use std::fmt;

/// Explicit credentials for one storage invocation.
#[derive(Clone, Deserialize)]
pub struct S3Credentials {
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
    /// Custom endpoint for S3-compatible providers (e.g. "http://localhost:9000" for MinIO)
    #[serde(default)]
    pub endpoint_url: Option<String>,
}

impl S3Credentials {
    pub fn new(
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        region: impl Into<String>,
        endpoint_url: Option<String>,
    ) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            region: region.into(),
            endpoint_url,
        }
    }

    /// The custom endpoint, if one was given. Blank values mean AWS.
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint_url
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }

    pub fn is_custom_endpoint(&self) -> bool {
        self.endpoint().is_some()
    }
}

impl fmt::Debug for S3Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("region", &self.region)
            .field("endpoint_url", &self.endpoint())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_endpoint_is_aws() {
        let creds = S3Credentials::new("AK", "SK", "eu-west-1", Some("  ".to_string()));
        assert_eq!(creds.endpoint(), None);
        assert!(!creds.is_custom_endpoint());
    }

    #[test]
    fn test_endpoint_is_trimmed() {
        let creds = S3Credentials::new("AK", "SK", "us-east-1", Some(" http://minio:9000 ".into()));
        assert_eq!(creds.endpoint(), Some("http://minio:9000"));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let creds = S3Credentials::new("AK", "super-secret", "us-east-1", None);
        let debug = format!("{:?}", creds);
        assert!(debug.contains("AK"));
        assert!(!debug.contains("super-secret"));
    }
}
