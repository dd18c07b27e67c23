mod errors;
mod memory;
mod redis;
mod types;

use std::sync::Arc;

use crate::config::{StoreConfig, StoreType};

pub use errors::StoreError;
pub use memory::InMemorySessionStore;
pub use self::redis::RedisSessionStore;
pub use types::{SessionRecord, SessionStore};

/// Creates the configured store and verifies it is reachable.
///
/// A store that can not be reached at startup is fatal for the caller.
#[tracing::instrument(skip(config), fields(store_type = ?config.store_type))]
pub async fn connect_store(config: &StoreConfig) -> Result<Arc<dyn SessionStore>, StoreError> {
    tracing::info!(
        "Initializing session store with type: {:?}, address: {}",
        config.store_type,
        config.address
    );

    let store: Arc<dyn SessionStore> = match config.store_type {
        StoreType::Memory => Arc::new(InMemorySessionStore::new()),
        StoreType::Redis => Arc::new(RedisSessionStore::new(config)?),
    };

    if let Err(e) = store.ping().await {
        tracing::error!("Failed to connect to session store: {}", e);
        return Err(e);
    }

    tracing::info!(
        "Connected to session store: type={:?}, pool_size={}",
        config.store_type,
        config.pool_size
    );
    Ok(store)
}
