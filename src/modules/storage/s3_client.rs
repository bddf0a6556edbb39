//! S3-compatible storage client
//!
//! Stores attachment bytes in a single bucket on MinIO or AWS S3.
//! Objects are written with one configured content type and no public
//! read policy, so they are only reachable through this service.

use async_trait::async_trait;
use s3::creds::Credentials;
use s3::{Bucket, Region};
use tracing::{debug, info};

use crate::core::config::StorageConfig;
use crate::core::error::AppError;
use crate::modules::storage::{ObjectStore, StorageError};

/// S3-compatible object store backed by `rust-s3`
pub struct S3ObjectStore {
    bucket: Box<Bucket>,
    content_type: String,
}

impl S3ObjectStore {
    /// Create a new client from configuration
    pub fn new(config: StorageConfig) -> Result<Self, AppError> {
        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| AppError::Internal(format!("Failed to create S3 credentials: {}", e)))?;

        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        };

        let mut bucket = Bucket::new(&config.bucket, region, credentials)
            .map_err(|e| AppError::Internal(format!("Failed to create S3 bucket handle: {}", e)))?;

        // MinIO needs http://endpoint/bucket instead of http://bucket.endpoint
        if config.path_style {
            bucket.set_path_style();
        }

        info!(
            "S3 object store initialized for endpoint: {}, bucket: {}, content_type: {}",
            config.endpoint,
            bucket.name(),
            config.content_type
        );

        Ok(Self {
            bucket,
            content_type: config.content_type,
        })
    }

    /// Get the bucket name
    pub fn bucket_name(&self) -> String {
        self.bucket.name()
    }
}

/// Map a non-2xx S3 response to a storage error
fn check_status(key: &str, action: &str, status: u16) -> Result<(), StorageError> {
    match status {
        200..=299 => Ok(()),
        404 => Err(StorageError::NotFound(key.to_string())),
        _ => Err(StorageError::Backend(format!(
            "Failed to {} '{}': status {}",
            action, key, status
        ))),
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn store(&self, key: &str, data: &[u8]) -> Result<(), StorageError> {
        let response = self
            .bucket
            .put_object_with_content_type(key, data, &self.content_type)
            .await
            .map_err(|e| StorageError::Backend(format!("Failed to upload '{}': {}", key, e)))?;

        check_status(key, "upload", response.status_code())?;

        debug!(
            "Uploaded object '{}' ({} bytes) to bucket '{}'",
            key,
            data.len(),
            self.bucket.name()
        );
        Ok(())
    }

    async fn fetch(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let response = self
            .bucket
            .get_object(key)
            .await
            .map_err(|e| StorageError::Backend(format!("Failed to download '{}': {}", key, e)))?;

        check_status(key, "download", response.status_code())?;

        debug!(
            "Downloaded object '{}' from bucket '{}'",
            key,
            self.bucket.name()
        );
        Ok(response.to_vec())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let response = self
            .bucket
            .delete_object(key)
            .await
            .map_err(|e| StorageError::Backend(format!("Failed to delete '{}': {}", key, e)))?;

        match check_status(key, "delete", response.status_code()) {
            Ok(()) | Err(StorageError::NotFound(_)) => {}
            Err(e) => return Err(e),
        }

        debug!(
            "Deleted object '{}' from bucket '{}'",
            key,
            self.bucket.name()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_status_success_range() {
        assert!(check_status("k", "upload", 200).is_ok());
        assert!(check_status("k", "delete", 204).is_ok());
    }

    #[test]
    fn test_check_status_not_found() {
        match check_status("1700000000000-a.pdf", "download", 404) {
            Err(StorageError::NotFound(key)) => assert_eq!(key, "1700000000000-a.pdf"),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_check_status_backend_failure() {
        match check_status("k", "upload", 503) {
            Err(StorageError::Backend(msg)) => assert!(msg.contains("503")),
            other => panic!("expected Backend, got {:?}", other),
        }
    }

    #[test]
    fn test_new_builds_without_network() {
        let store = S3ObjectStore::new(StorageConfig {
            endpoint: "http://localhost:9000".to_string(),
            access_key: "minioadmin".to_string(),
            secret_key: "minioadmin".to_string(),
            bucket: "kidcare-attachments".to_string(),
            region: "us-east-1".to_string(),
            path_style: true,
            content_type: "application/pdf".to_string(),
        })
        .unwrap();
        assert_eq!(store.bucket_name(), "kidcare-attachments");
    }
}
