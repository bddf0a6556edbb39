use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::features::attachments::models::Attachment;

/// Multipart field carrying file parts; may repeat
pub const ATTACHMENT_FIELD: &str = "attachment";

/// Multipart field carrying the optional child id
pub const CHILD_ID_FIELD: &str = "childId";

/// Upload request DTO for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handlers use axum's Multipart extractor directly.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct UploadAttachmentDto {
    /// One or more files, repeated under the same field name
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub attachment: Vec<String>,
    /// Child the files belong to (optional)
    #[schema(example = 12)]
    pub child_id: Option<i64>,
}

/// Response DTO for a stored attachment
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentResponseDto {
    pub id: Uuid,
    /// "User" or "Child"
    #[schema(example = "User")]
    pub file_type: String,
    /// Storage key, used for downloads
    #[schema(example = "1700000000000-invoice.pdf")]
    pub attachment_key: String,
    pub original_filename: String,
    pub content_type: String,
    pub file_size: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Attachment> for AttachmentResponseDto {
    fn from(attachment: Attachment) -> Self {
        Self {
            id: attachment.id,
            file_type: attachment.owner_kind,
            attachment_key: attachment.attachment_key,
            original_filename: attachment.original_filename,
            content_type: attachment.content_type,
            file_size: attachment.file_size,
            created_at: attachment.created_at,
        }
    }
}

/// Upload success body: `{"status": true, "attachment": [...]}`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadAttachmentsResponseDto {
    pub status: bool,
    pub attachment: Vec<AttachmentResponseDto>,
}

impl UploadAttachmentsResponseDto {
    pub fn created(attachment: Vec<AttachmentResponseDto>) -> Self {
        Self {
            status: true,
            attachment,
        }
    }
}

/// Download query parameters
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DownloadQueryDto {
    /// Storage key of the attachment
    pub key: Option<String>,
}
