use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Entity an attachment is classified under and linked to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OwnerKind {
    User,
    Child,
}

impl OwnerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OwnerKind::User => "User",
            OwnerKind::Child => "Child",
        }
    }
}

/// One side of a relation link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Owner {
    User(i64),
    Child(i64),
}

/// Database model for attachments
#[derive(Debug, Clone, FromRow)]
pub struct Attachment {
    pub id: Uuid,
    pub owner_kind: String,
    pub attachment_key: String,
    pub original_filename: String,
    pub content_type: String,
    pub file_size: i64,
    pub created_at: DateTime<Utc>,
}

/// Values for a new attachment row
#[derive(Debug, Clone)]
pub struct NewAttachment {
    pub owner_kind: OwnerKind,
    pub attachment_key: String,
    pub original_filename: String,
    pub content_type: String,
    pub file_size: i64,
}
