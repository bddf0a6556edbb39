//! In-memory collaborators and session helpers for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use chrono::{DateTime, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use uuid::Uuid;

use crate::core::config::AuthConfig;
use crate::core::middleware;
use crate::features::attachments::models::{Attachment, NewAttachment, Owner};
use crate::features::attachments::repositories::{AttachmentRepository, RelationLinker};
use crate::features::attachments::{routes as attachment_routes, AttachmentService};
use crate::features::auth::model::SessionClaims;
use crate::features::auth::SessionValidator;
use crate::modules::storage::{ObjectStore, StorageError};

pub const TEST_SESSION_SECRET: &str = "test-session-secret";

/// Milliseconds returned by `fixed_clock`
pub const FIXED_MILLIS: i64 = 1_700_000_000_000;

pub fn fixed_clock() -> DateTime<Utc> {
    DateTime::from_timestamp_millis(FIXED_MILLIS).unwrap()
}

pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        session_secret: TEST_SESSION_SECRET.to_string(),
        cookie_name: "session".to_string(),
        leeway: Duration::from_secs(0),
    }
}

/// Sign a session token the way the login service does
pub fn session_token(user_id: i64, role: Option<&str>) -> String {
    let claims = SessionClaims {
        sub: user_id.to_string(),
        role: role.map(str::to_string),
        exp: (Utc::now().timestamp() + 3600) as u64,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SESSION_SECRET.as_bytes()),
    )
    .unwrap()
}

/// Attachment routes behind the real session middleware, wired to fakes
pub fn attachment_app(store: Arc<InMemoryObjectStore>, db: Arc<InMemoryDatabase>) -> Router {
    let service = Arc::new(AttachmentService::new(store, db.clone(), db));
    let validator = Arc::new(SessionValidator::new(&test_auth_config()));

    attachment_routes(service, 1024 * 1024).route_layer(axum::middleware::from_fn_with_state(
        validator,
        middleware::auth_middleware,
    ))
}

/// Object store kept in a map, with call counters and failure switches
#[derive(Default)]
pub struct InMemoryObjectStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    store_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
    fail_store_suffix: Mutex<Option<String>>,
    fail_deletes: AtomicBool,
}

impl InMemoryObjectStore {
    /// Make `store` fail for keys ending in `suffix`
    pub fn fail_store_for(&self, suffix: &str) {
        *self.fail_store_suffix.lock().unwrap() = Some(suffix.to_string());
    }

    pub fn fail_deletes(&self) {
        self.fail_deletes.store(true, Ordering::SeqCst);
    }

    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn store_calls(&self) -> usize {
        self.store_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn store(&self, key: &str, data: &[u8]) -> Result<(), StorageError> {
        self.store_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(suffix) = self.fail_store_suffix.lock().unwrap().as_deref() {
            if key.ends_with(suffix) {
                return Err(StorageError::Backend(format!("injected failure for '{}'", key)));
            }
        }

        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), data.to_vec());
        Ok(())
    }

    async fn fetch(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.get(key)
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StorageError::Backend("injected delete failure".to_string()));
        }
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }
}

/// Attachment rows and relation links in memory; deleting a row drops its links
#[derive(Default)]
pub struct InMemoryDatabase {
    attachments: Mutex<Vec<Attachment>>,
    links: Mutex<Vec<(Owner, Uuid)>>,
    create_calls: AtomicUsize,
    fail_creates: AtomicBool,
    fail_child_links: AtomicBool,
}

impl InMemoryDatabase {
    pub fn fail_creates(&self) {
        self.fail_creates.store(true, Ordering::SeqCst);
    }

    pub fn fail_child_links(&self) {
        self.fail_child_links.store(true, Ordering::SeqCst);
    }

    pub fn attachment_count(&self) -> usize {
        self.attachments.lock().unwrap().len()
    }

    pub fn links(&self) -> Vec<(Owner, Uuid)> {
        self.links.lock().unwrap().clone()
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AttachmentRepository for InMemoryDatabase {
    async fn create(&self, attachment: NewAttachment) -> Result<Attachment, sqlx::Error> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_creates.load(Ordering::SeqCst) {
            return Err(sqlx::Error::PoolTimedOut);
        }

        let row = Attachment {
            id: Uuid::new_v4(),
            owner_kind: attachment.owner_kind.as_str().to_string(),
            attachment_key: attachment.attachment_key,
            original_filename: attachment.original_filename,
            content_type: attachment.content_type,
            file_size: attachment.file_size,
            created_at: Utc::now(),
        };
        self.attachments.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> Result<(), sqlx::Error> {
        self.attachments.lock().unwrap().retain(|a| a.id != id);
        self.links.lock().unwrap().retain(|(_, linked)| *linked != id);
        Ok(())
    }
}

#[async_trait]
impl RelationLinker for InMemoryDatabase {
    async fn link(&self, owner: Owner, attachment_id: Uuid) -> Result<(), sqlx::Error> {
        if matches!(owner, Owner::Child(_)) && self.fail_child_links.load(Ordering::SeqCst) {
            return Err(sqlx::Error::PoolTimedOut);
        }

        let mut links = self.links.lock().unwrap();
        if !links.contains(&(owner, attachment_id)) {
            links.push((owner, attachment_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_twice_same_key_keeps_second_payload() {
        let store = InMemoryObjectStore::default();
        store.store("1-a.pdf", b"one").await.unwrap();
        store.store("1-a.pdf", b"two").await.unwrap();

        assert_eq!(store.fetch("1-a.pdf").await.unwrap(), b"two".to_vec());
        assert_eq!(store.object_count(), 1);
    }

    #[tokio::test]
    async fn test_link_is_idempotent() {
        let db = InMemoryDatabase::default();
        let id = Uuid::new_v4();
        db.link(Owner::User(1), id).await.unwrap();
        db.link(Owner::User(1), id).await.unwrap();
        assert_eq!(db.links().len(), 1);
    }
}
