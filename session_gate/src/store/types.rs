use async_trait::async_trait;

use super::errors::StoreError;

/// A live session record.
///
/// The value is whatever bytes the login flow stored; only its existence
/// matters here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub session_id: String,
    pub value: Vec<u8>,
}

/// Key/value access to the shared session store.
///
/// Implementations are shared between concurrent request handlers.
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// Verify the store is reachable. Called once at startup.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Look up a session record. A missing key is `Ok(None)`.
    async fn get(&self, session_id: &str) -> Result<Option<SessionRecord>, StoreError>;

    /// Delete a session record. Returns whether a record was removed; a
    /// missing key is not an error.
    async fn delete(&self, session_id: &str) -> Result<bool, StoreError>;
}
