pub mod attachments;
pub mod auth;
