use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::attachments::{dtos as attachments_dtos, handlers as attachments_handlers};
use crate::shared::types::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        attachments_handlers::upload_attachments,
        attachments_handlers::upload_attachments_for_user,
        attachments_handlers::download_attachment,
    ),
    components(
        schemas(
            ErrorResponse,
            attachments_dtos::UploadAttachmentDto,
            attachments_dtos::AttachmentResponseDto,
            attachments_dtos::UploadAttachmentsResponseDto,
        )
    ),
    tags(
        (name = "attachments", description = "Attachment upload and download for users and children"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Kidcare Attachments API",
        version = "0.1.0",
        description = "Attachment upload and download for members and children",
    )
)]
pub struct ApiDoc;

/// Adds the session cookie security scheme to the OpenAPI document
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("session"))),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
