use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::features::attachments::models::Owner;

/// Associates attachments with the users and children that own them
#[async_trait]
pub trait RelationLinker: Send + Sync {
    /// Link `attachment_id` to `owner`. Linking the same pair twice is a no-op.
    async fn link(&self, owner: Owner, attachment_id: Uuid) -> Result<(), sqlx::Error>;
}

pub struct PgRelationLinker {
    pool: PgPool,
}

impl PgRelationLinker {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RelationLinker for PgRelationLinker {
    async fn link(&self, owner: Owner, attachment_id: Uuid) -> Result<(), sqlx::Error> {
        let (sql, owner_id) = match owner {
            Owner::User(id) => (
                "INSERT INTO user_attachments (user_id, attachment_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
                id,
            ),
            Owner::Child(id) => (
                "INSERT INTO child_attachments (child_id, attachment_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
                id,
            ),
        };

        sqlx::query(sql)
            .bind(owner_id)
            .bind(attachment_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
