//! Storage module for attachment bytes
//!
//! Defines the `ObjectStore` seam and its S3-compatible implementation.

mod object_store;
mod s3_client;

pub use object_store::{ObjectStore, StorageError};
pub use s3_client::S3ObjectStore;
