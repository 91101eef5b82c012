//! Friendly descriptions for S3 error codes.

/// Human-readable text for a known S3 error code.
pub fn friendly_message(code: &str) -> Option<&'static str> {
    let message = match code {
        "NoSuchBucket" => "Bucket does not exist",
        "NoSuchKey" => "Object does not exist",
        "NoSuchBucketPolicy" => "Bucket has no policy",
        "BucketAlreadyExists" => "Bucket name is already taken by another account",
        "BucketAlreadyOwnedByYou" => "Bucket already exists and is owned by you",
        "AccessDenied" => "Access denied: the credentials lack permission for this operation",
        "InvalidAccessKeyId" => "The access key does not exist",
        "SignatureDoesNotMatch" => "The secret key does not match the access key",
        "InvalidBucketName" => "The bucket name is not valid",
        "ReplicationConfigurationNotFoundError" => "Bucket has no replication configuration",
        "NoSuchLoggingConfiguration" => "Bucket has no logging configuration",
        "InvalidLocationConstraint" | "IllegalLocationConstraintException" => {
            "The region does not match the bucket location"
        }
        "MethodNotAllowed" => "The operation is not allowed on this resource",
        "NotImplemented" => "The storage service does not implement this operation",
        _ => return None,
    };
    Some(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(friendly_message("NoSuchKey"), Some("Object does not exist"));
        assert_eq!(
            friendly_message("IllegalLocationConstraintException"),
            friendly_message("InvalidLocationConstraint")
        );
    }

    #[test]
    fn test_unknown_code() {
        assert_eq!(friendly_message("InternalError"), None);
        assert_eq!(friendly_message(""), None);
    }
}
