//! session_gate - server-side session checks for gated static content
//!
//! A request is let through only when its signed session cookie verifies,
//! the browser's `User-Agent` matches the one bound into the cookie at login,
//! and the session record still exists in the shared store. Everything else
//! is denied the same way.

mod config;
mod cookie;
mod errors;
mod session;
mod store;
mod title;
mod utils;

pub use config::{
    ConfigError, DEFAULT_COOKIE_NAME, DEFAULT_TITLE, GateConfig, StoreConfig, StoreType,
    TitleLookupConfig, load_secret_file,
};

pub use cookie::{
    CookieAttributes, CookieCodec, CookieError, EncryptionKey, SameSite, SessionPayload,
    SigningKey, derive_encryption_key, derive_signing_key,
};

pub use errors::GateError;

pub use session::{Decision, DenyReason, LogoutOutcome, LogoutResponse, SessionGate};

pub use store::{
    InMemorySessionStore, RedisSessionStore, SessionRecord, SessionStore, StoreError,
    connect_store,
};

pub use title::{
    TitleError, TitleLookup, YoutubeTitleLookup, resolve_display_title,
    resolve_display_title_with,
};

pub use utils::{UtilError, gen_random_string};

/// Validate `config`, connect the configured store and build the gate.
///
/// Errors here are fatal: the process should not start serving.
pub async fn init(config: &GateConfig) -> Result<SessionGate, GateError> {
    config.validate()?;
    let store = connect_store(&config.store).await?;
    Ok(SessionGate::from_config(config, store)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_with_memory_store() {
        let mut config = GateConfig::new("secret", "https://login.example.com/");
        config.store.store_type = StoreType::Memory;

        let gate = init(&config).await.unwrap();

        assert_eq!(gate.attributes().name(), DEFAULT_COOKIE_NAME);
        assert!(!gate.codec().is_encrypted());
    }

    #[tokio::test]
    async fn test_init_rejects_invalid_config() {
        let mut config = GateConfig::new("", "https://login.example.com/");
        config.store.store_type = StoreType::Memory;

        assert!(matches!(init(&config).await, Err(GateError::Config(_))));
    }
}
