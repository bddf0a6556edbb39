mod attachment_repository;
mod relation_linker;

pub use attachment_repository::{AttachmentRepository, PgAttachmentRepository};
pub use relation_linker::{PgRelationLinker, RelationLinker};
