use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::features::attachments::dtos::AttachmentResponseDto;
use crate::features::attachments::error::AttachmentError;
use crate::features::attachments::models::{Attachment, NewAttachment, Owner, OwnerKind};
use crate::features::attachments::repositories::{AttachmentRepository, RelationLinker};
use crate::modules::storage::ObjectStore;

/// Who an upload is for: the acting user, plus a child when the files belong to one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadContext {
    pub user_id: i64,
    pub child_id: Option<i64>,
}

impl UploadContext {
    pub fn owner_kind(&self) -> OwnerKind {
        if self.child_id.is_some() {
            OwnerKind::Child
        } else {
            OwnerKind::User
        }
    }

    /// Owners every attachment of this upload gets linked to, user first
    pub fn owners(&self) -> Vec<Owner> {
        let mut owners = vec![Owner::User(self.user_id)];
        if let Some(child_id) = self.child_id {
            owners.push(Owner::Child(child_id));
        }
        owners
    }
}

/// One file part of an upload request
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub data: Vec<u8>,
    pub original_filename: String,
    pub content_type: String,
}

/// Undo steps recorded while an upload progresses
#[derive(Debug)]
enum Compensation {
    DeleteObject(String),
    DeleteAttachment(Uuid),
}

/// Derive the storage key `"<epoch-millis>-<filename>"`.
///
/// Only the last path segment of the client filename is used. Two uploads of
/// the same name within one millisecond share a key and the later object
/// replaces the earlier one.
pub fn storage_key(uploaded_at: DateTime<Utc>, original_filename: &str) -> String {
    let name = original_filename
        .rsplit(['/', '\\'])
        .next()
        .filter(|n| !n.is_empty())
        .unwrap_or("unnamed");

    format!("{}-{}", uploaded_at.timestamp_millis(), name)
}

/// Service for attachment uploads and downloads
pub struct AttachmentService {
    object_store: Arc<dyn ObjectStore>,
    repository: Arc<dyn AttachmentRepository>,
    linker: Arc<dyn RelationLinker>,
    clock: fn() -> DateTime<Utc>,
}

impl AttachmentService {
    pub fn new(
        object_store: Arc<dyn ObjectStore>,
        repository: Arc<dyn AttachmentRepository>,
        linker: Arc<dyn RelationLinker>,
    ) -> Self {
        Self {
            object_store,
            repository,
            linker,
            clock: Utc::now,
        }
    }

    #[cfg(test)]
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// Store every file, record its metadata and link it to its owners.
    ///
    /// Files are processed strictly in order. If any step fails, everything
    /// this request already wrote is undone in reverse order and the first
    /// error is returned; the caller sees either all attachments or none.
    pub async fn upload_attachments(
        &self,
        context: UploadContext,
        files: Vec<UploadFile>,
    ) -> Result<Vec<AttachmentResponseDto>, AttachmentError> {
        if files.is_empty() {
            return Err(AttachmentError::NoFiles);
        }

        let mut compensations = Vec::new();
        let mut created = Vec::with_capacity(files.len());

        for file in files {
            match self.upload_one(&context, file, &mut compensations).await {
                Ok(attachment) => created.push(attachment),
                Err(e) => {
                    self.compensate(compensations).await;
                    return Err(e);
                }
            }
        }

        info!(
            "Uploaded {} attachment(s): user_id={}, child_id={:?}",
            created.len(),
            context.user_id,
            context.child_id
        );

        Ok(created.into_iter().map(AttachmentResponseDto::from).collect())
    }

    async fn upload_one(
        &self,
        context: &UploadContext,
        file: UploadFile,
        compensations: &mut Vec<Compensation>,
    ) -> Result<Attachment, AttachmentError> {
        let key = storage_key((self.clock)(), &file.original_filename);
        let file_size = file.data.len() as i64;

        self.object_store.store(&key, &file.data).await?;
        compensations.push(Compensation::DeleteObject(key.clone()));
        debug!("Attachment object stored: {}", key);

        let attachment = self
            .repository
            .create(NewAttachment {
                owner_kind: context.owner_kind(),
                attachment_key: key,
                original_filename: file.original_filename,
                content_type: file.content_type,
                file_size,
            })
            .await?;
        compensations.push(Compensation::DeleteAttachment(attachment.id));

        for owner in context.owners() {
            self.linker.link(owner, attachment.id).await?;
            debug!("Attachment {} linked to {:?}", attachment.id, owner);
        }

        Ok(attachment)
    }

    /// Undo recorded steps, newest first. Failures are logged and skipped so
    /// the remaining steps still run.
    async fn compensate(&self, compensations: Vec<Compensation>) {
        for step in compensations.into_iter().rev() {
            let outcome = match &step {
                Compensation::DeleteAttachment(id) => self
                    .repository
                    .delete(*id)
                    .await
                    .map_err(|e| e.to_string()),
                Compensation::DeleteObject(key) => self
                    .object_store
                    .delete(key)
                    .await
                    .map_err(|e| e.to_string()),
            };

            match outcome {
                Ok(()) => debug!("Compensated {:?}", step),
                Err(e) => warn!("Compensation {:?} failed: {}", step, e),
            }
        }
    }

    /// Fetch the raw bytes stored under `key`
    pub async fn download_attachment(&self, key: Option<&str>) -> Result<Vec<u8>, AttachmentError> {
        let key = key
            .filter(|k| !k.is_empty())
            .ok_or(AttachmentError::MissingKey)?;

        let data = self.object_store.fetch(key).await?;
        debug!("Attachment downloaded: key={}, size={}", key, data.len());

        Ok(data)
    }
}
