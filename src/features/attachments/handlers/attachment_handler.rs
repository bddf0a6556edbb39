use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::debug;

use crate::core::error::AppError;
use crate::core::extractor::{AppMultipart, AppQuery};
use crate::features::attachments::dtos::{
    DownloadQueryDto, UploadAttachmentDto, UploadAttachmentsResponseDto, ATTACHMENT_FIELD,
    CHILD_ID_FIELD,
};
use crate::features::attachments::error::AttachmentError;
use crate::features::attachments::services::{AttachmentService, UploadContext, UploadFile};
use crate::features::auth::guards::RequireAdmin;
use crate::features::auth::model::AuthenticatedUser;
use crate::shared::types::ErrorResponse;

const UPLOAD_ERROR: &str = "Cannot upload attachment";
const DOWNLOAD_ERROR: &str = "Cannot download attach file";

/// Files and child id read from an upload form
struct UploadForm {
    files: Vec<UploadFile>,
    child_id: Option<i64>,
}

/// Collect every `attachment` file part and the optional `childId` field.
///
/// A single part and repeated parts both end up in one list. Parts without a
/// filename are not files, and an empty file input (blank filename, no bytes)
/// is dropped.
async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AttachmentError> {
    let mut files = Vec::new();
    let mut child_id = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AttachmentError::InvalidField(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        if field_name == ATTACHMENT_FIELD {
            let Some(file_name) = field.file_name().map(|s| s.to_string()) else {
                debug!("Ignoring non-file {} part", ATTACHMENT_FIELD);
                continue;
            };

            let content_type = field
                .content_type()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "application/octet-stream".to_string());

            let data = field.bytes().await.map_err(|e| {
                debug!("Failed to read file bytes: {}", e);
                AttachmentError::InvalidField(format!("Failed to read file data: {}", e))
            })?;

            if file_name.is_empty() && data.is_empty() {
                debug!("Ignoring empty file input");
                continue;
            }

            let original_filename = if file_name.is_empty() {
                "unnamed".to_string()
            } else {
                file_name
            };

            files.push(UploadFile {
                data: data.to_vec(),
                original_filename,
                content_type,
            });
        } else if field_name == CHILD_ID_FIELD {
            let text = field.text().await.map_err(|e| {
                AttachmentError::InvalidField(format!("Failed to read {} field: {}", CHILD_ID_FIELD, e))
            })?;
            child_id = parse_child_id(&text)?;
        } else {
            debug!("Ignoring unknown field: {}", field_name);
        }
    }

    Ok(UploadForm { files, child_id })
}

/// Blank means no child
fn parse_child_id(text: &str) -> Result<Option<i64>, AttachmentError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    text.parse::<i64>().map(Some).map_err(|_| {
        AttachmentError::InvalidField(format!("{} must be an integer", CHILD_ID_FIELD))
    })
}

async fn upload_for(
    service: &AttachmentService,
    user_id: i64,
    multipart: Multipart,
) -> Result<(StatusCode, Json<UploadAttachmentsResponseDto>), AppError> {
    let form = read_upload_form(multipart)
        .await
        .map_err(|e| e.into_app_error(UPLOAD_ERROR))?;

    let context = UploadContext {
        user_id,
        child_id: form.child_id,
    };

    let created = service
        .upload_attachments(context, form.files)
        .await
        .map_err(|e| e.into_app_error(UPLOAD_ERROR))?;

    Ok((
        StatusCode::CREATED,
        Json(UploadAttachmentsResponseDto::created(created)),
    ))
}

/// Build `attachment; filename="<name>"`, adding an RFC 5987 `filename*`
/// parameter when the name is not plain ASCII
pub fn content_disposition(filename: &str) -> HeaderValue {
    let fallback: String = filename
        .chars()
        .map(|c| match c {
            '"' | '\\' => format!("\\{}", c),
            c if c.is_ascii() && !c.is_ascii_control() => c.to_string(),
            _ => "?".to_string(),
        })
        .collect();

    let mut value = format!("attachment; filename=\"{}\"", fallback);
    if !filename.is_ascii() {
        value.push_str(&format!(
            "; filename*=UTF-8''{}",
            urlencoding::encode(filename)
        ));
    }

    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}

/// Upload attachments for the signed-in user
///
/// Accepts multipart/form-data with:
/// - `attachment`: one or more files (required)
/// - `childId`: child the files belong to (optional)
#[utoipa::path(
    post,
    path = "/api/attachment",
    tag = "attachments",
    request_body(
        content = UploadAttachmentDto,
        content_type = "multipart/form-data",
        description = "Files under `attachment`, optional `childId`",
    ),
    responses(
        (status = 201, description = "Attachments stored", body = UploadAttachmentsResponseDto),
        (status = 400, description = "No files or invalid field", body = ErrorResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 500, description = "Metadata could not be saved", body = ErrorResponse),
        (status = 502, description = "Object storage failed", body = ErrorResponse)
    ),
    security(
        ("session" = [])
    )
)]
pub async fn upload_attachments(
    user: AuthenticatedUser,
    State(service): State<Arc<AttachmentService>>,
    AppMultipart(multipart): AppMultipart,
) -> Result<(StatusCode, Json<UploadAttachmentsResponseDto>), AppError> {
    upload_for(&service, user.user_id, multipart).await
}

/// Upload attachments on behalf of a user (admin only)
#[utoipa::path(
    post,
    path = "/api/attachment/user/{user_id}",
    tag = "attachments",
    params(
        ("user_id" = i64, Path, description = "User the attachments belong to")
    ),
    request_body(
        content = UploadAttachmentDto,
        content_type = "multipart/form-data",
        description = "Files under `attachment`, optional `childId`",
    ),
    responses(
        (status = 201, description = "Attachments stored", body = UploadAttachmentsResponseDto),
        (status = 400, description = "No files or invalid field", body = ErrorResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 403, description = "Admin access required", body = ErrorResponse),
        (status = 500, description = "Metadata could not be saved", body = ErrorResponse),
        (status = 502, description = "Object storage failed", body = ErrorResponse)
    ),
    security(
        ("session" = [])
    )
)]
pub async fn upload_attachments_for_user(
    RequireAdmin(admin): RequireAdmin,
    Path(user_id): Path<i64>,
    State(service): State<Arc<AttachmentService>>,
    AppMultipart(multipart): AppMultipart,
) -> Result<(StatusCode, Json<UploadAttachmentsResponseDto>), AppError> {
    debug!("Admin {} uploading for user {}", admin.user_id, user_id);
    upload_for(&service, user_id, multipart).await
}

/// Download an attachment by storage key
#[utoipa::path(
    get,
    path = "/api/attachment/download",
    tag = "attachments",
    params(DownloadQueryDto),
    responses(
        (status = 200, description = "Raw attachment bytes", content_type = "application/octet-stream", body = Vec<u8>),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 404, description = "Missing key or unknown attachment", body = ErrorResponse),
        (status = 502, description = "Object storage failed", body = ErrorResponse)
    ),
    security(
        ("session" = [])
    )
)]
pub async fn download_attachment(
    State(service): State<Arc<AttachmentService>>,
    AppQuery(query): AppQuery<DownloadQueryDto>,
) -> Result<Response, AppError> {
    let data = service
        .download_attachment(query.key.as_deref())
        .await
        .map_err(|e| e.into_app_error(DOWNLOAD_ERROR))?;

    let key = query.key.unwrap_or_default();

    Ok((
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/octet-stream"),
            ),
            (header::CONTENT_DISPOSITION, content_disposition(&key)),
            (
                header::ACCESS_CONTROL_EXPOSE_HEADERS,
                HeaderValue::from_static("Content-Disposition"),
            ),
        ],
        Body::from(data),
    )
        .into_response())
}
