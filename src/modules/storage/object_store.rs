use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Object '{0}' not found")]
    NotFound(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Key-addressed blob storage
///
/// Implementations perform a single attempt per call; transport failures
/// propagate to the caller unchanged.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write `data` under `key`. Writing an existing key replaces the object.
    async fn store(&self, key: &str, data: &[u8]) -> Result<(), StorageError>;

    /// Read the raw object body stored under `key`.
    async fn fetch(&self, key: &str) -> Result<Vec<u8>, StorageError>;

    /// Remove the object stored under `key`. Removing a missing key succeeds.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}
