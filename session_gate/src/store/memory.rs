use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::errors::StoreError;
use super::types::{SessionRecord, SessionStore};

/// Process-local session store for development runs and tests.
///
/// Records never expire on their own. The store can be switched to an
/// unavailable state to reproduce a store outage.
#[derive(Default)]
pub struct InMemorySessionStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
    unavailable: AtomicBool,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        tracing::info!("Creating new in-memory session store");
        Self::default()
    }

    /// Seed a record, as the login flow would.
    pub async fn insert(&self, session_id: impl Into<String>, value: impl Into<Vec<u8>>) {
        self.entries
            .write()
            .await
            .insert(session_id.into(), value.into());
    }

    pub async fn contains(&self, session_id: &str) -> bool {
        self.entries.read().await.contains_key(session_id)
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(StoreError::Connection("store unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.check_available()
    }

    async fn get(&self, session_id: &str) -> Result<Option<SessionRecord>, StoreError> {
        self.check_available()?;
        Ok(self
            .entries
            .read()
            .await
            .get(session_id)
            .map(|value| SessionRecord {
                session_id: session_id.to_string(),
                value: value.clone(),
            }))
    }

    async fn delete(&self, session_id: &str) -> Result<bool, StoreError> {
        self.check_available()?;
        Ok(self.entries.write().await.remove(session_id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_get() {
        // Given a store with one record
        let store = InMemorySessionStore::new();
        store.insert("sid-42", "{\"user\":\"alice\"}").await;

        // When getting it
        let record = store.get("sid-42").await.unwrap();

        // Then the record is returned unchanged
        assert_eq!(
            record,
            Some(SessionRecord {
                session_id: "sid-42".to_string(),
                value: b"{\"user\":\"alice\"}".to_vec(),
            })
        );
    }

    #[tokio::test]
    async fn test_get_nonexistent_key() {
        let store = InMemorySessionStore::new();
        assert_eq!(store.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = InMemorySessionStore::new();
        store.insert("sid-42", "v").await;

        assert!(store.delete("sid-42").await.unwrap());
        assert!(!store.delete("sid-42").await.unwrap());
        assert!(!store.contains("sid-42").await);
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_every_operation() {
        let store = InMemorySessionStore::new();
        store.insert("sid-42", "v").await;
        store.set_unavailable(true);

        assert!(matches!(store.ping().await, Err(StoreError::Connection(_))));
        assert!(matches!(
            store.get("sid-42").await,
            Err(StoreError::Connection(_))
        ));
        assert!(matches!(
            store.delete("sid-42").await,
            Err(StoreError::Connection(_))
        ));

        // The record is untouched and visible again once the store recovers
        store.set_unavailable(false);
        assert!(store.get("sid-42").await.unwrap().is_some());
    }
}
