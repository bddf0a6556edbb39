use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::attachments::models::{Attachment, NewAttachment};

/// Persists attachment metadata rows
#[async_trait]
pub trait AttachmentRepository: Send + Sync {
    /// Insert one row and return it with its generated id
    async fn create(&self, attachment: NewAttachment) -> Result<Attachment, sqlx::Error>;

    /// Remove a row; its relation links go with it
    async fn delete(&self, id: Uuid) -> Result<(), sqlx::Error>;
}

pub struct PgAttachmentRepository {
    pool: PgPool,
}

impl PgAttachmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttachmentRepository for PgAttachmentRepository {
    async fn create(&self, attachment: NewAttachment) -> Result<Attachment, sqlx::Error> {
        sqlx::query_as::<_, Attachment>(
            r#"
            INSERT INTO attachments (owner_kind, attachment_key, original_filename, content_type, file_size)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, owner_kind, attachment_key, original_filename, content_type, file_size, created_at
            "#,
        )
        .bind(attachment.owner_kind.as_str())
        .bind(&attachment.attachment_key)
        .bind(&attachment.original_filename)
        .bind(&attachment.content_type)
        .bind(attachment.file_size)
        .fetch_one(&self.pool)
        .await
    }

    async fn delete(&self, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM attachments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
