mod attachment;

pub use attachment::{Attachment, NewAttachment, Owner, OwnerKind};
