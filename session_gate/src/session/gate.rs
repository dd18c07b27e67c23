use std::sync::Arc;
use std::time::Duration;

use http::HeaderMap;

use crate::config::GateConfig;
use crate::cookie::{CookieAttributes, CookieCodec, CookieError, SameSite, SessionPayload};
use crate::store::SessionStore;

/// Validates requests and performs logouts against one cookie codec and one store.
///
/// Cheap to clone; clones share the store.
#[derive(Clone)]
pub struct SessionGate {
    pub(super) codec: CookieCodec,
    pub(super) attributes: CookieAttributes,
    pub(super) store: Arc<dyn SessionStore>,
    pub(super) store_timeout: Duration,
}

impl SessionGate {
    pub fn new(
        codec: CookieCodec,
        attributes: CookieAttributes,
        store: Arc<dyn SessionStore>,
        store_timeout: Duration,
    ) -> Self {
        Self {
            codec,
            attributes,
            store,
            store_timeout,
        }
    }

    /// Derives the cookie keys and attributes from `config` and wraps `store`.
    pub fn from_config(
        config: &GateConfig,
        store: Arc<dyn SessionStore>,
    ) -> Result<Self, CookieError> {
        let codec = CookieCodec::from_secrets(
            &config.signing_secret,
            config.encryption_secret.as_deref(),
        );
        let attributes = CookieAttributes::new(
            config.cookie_name.clone(),
            "/",
            config.cookie_domain.clone(),
            config.cookie_expire_seconds,
            config.cookie_secure,
            SameSite::Lax,
        )?;
        tracing::info!(
            "Session cookie '{}' is {}",
            attributes.name(),
            if codec.is_encrypted() {
                "signed and encrypted"
            } else {
                "signed"
            }
        );
        Ok(Self::new(codec, attributes, store, config.store.timeout))
    }

    pub fn codec(&self) -> &CookieCodec {
        &self.codec
    }

    pub fn attributes(&self) -> &CookieAttributes {
        &self.attributes
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Encodes `payload` and appends the session `Set-Cookie` to `headers`.
    ///
    /// Sessions are created by the login flow; this is its cookie half.
    pub fn issue_cookie(
        &self,
        payload: &SessionPayload,
        headers: &mut HeaderMap,
    ) -> Result<(), CookieError> {
        let value = self.codec.encode(payload)?;
        self.attributes.set_cookie_header(headers, &value)
    }

    /// The verified session payload carried by the request, if any
    pub fn session_from_headers(&self, headers: &HeaderMap) -> Option<SessionPayload> {
        self.attributes
            .read_from(headers)
            .and_then(|value| self.codec.decode(&value))
    }
}
