use thiserror::Error;
use tracing::{error, warn};

use crate::core::error::AppError;
use crate::modules::storage::StorageError;

/// Failures of the upload and download flows
#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("no files were uploaded")]
    NoFiles,

    #[error("invalid field: {0}")]
    InvalidField(String),

    #[error("no file key")]
    MissingKey,

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("persistence failure: {0}")]
    Persistence(#[from] sqlx::Error),
}

impl AttachmentError {
    /// Convert into the boundary error.
    ///
    /// Downstream failures surface `generic_message` only; the cause is logged.
    /// Storage backend failures map to 502, persistence failures to 500 and an
    /// object missing from the bucket to 404.
    pub fn into_app_error(self, generic_message: &str) -> AppError {
        match self {
            AttachmentError::NoFiles => AppError::BadRequest("No files were uploaded.".to_string()),
            AttachmentError::InvalidField(msg) => AppError::BadRequest(msg),
            AttachmentError::MissingKey => AppError::NotFound("No file key.".to_string()),
            AttachmentError::Storage(StorageError::NotFound(key)) => {
                warn!("Attachment object '{}' not found in storage", key);
                AppError::NotFound("Attachment not found".to_string())
            }
            AttachmentError::Storage(StorageError::Backend(msg)) => {
                error!("{}: {}", generic_message, msg);
                AppError::ExternalServiceError(generic_message.to_string())
            }
            AttachmentError::Persistence(e) => {
                error!("{}: {:?}", generic_message, e);
                AppError::Internal(generic_message.to_string())
            }
        }
    }
}
