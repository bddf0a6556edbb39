use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::features::attachments::handlers::{
    download_attachment, upload_attachments, upload_attachments_for_user,
};
use crate::features::attachments::services::AttachmentService;

/// Create routes for the attachments feature
pub fn routes(attachment_service: Arc<AttachmentService>, max_upload_size: usize) -> Router {
    Router::new()
        .route(
            "/api/attachment",
            post(upload_attachments).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route(
            "/api/attachment/user/{user_id}",
            post(upload_attachments_for_user).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/api/attachment/download", get(download_attachment))
        .with_state(attachment_service)
}
