//! Test utilities for session module tests

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use http::{HeaderMap, HeaderValue};
use http::header::{COOKIE, USER_AGENT};

use crate::cookie::{CookieAttributes, CookieCodec, SameSite, SessionPayload};
use crate::store::{InMemorySessionStore, SessionRecord, SessionStore, StoreError};

use super::gate::SessionGate;

pub(crate) fn sample_payload(user_agent: &str) -> SessionPayload {
    SessionPayload::new("google", "sid-42", user_agent, 1_700_000_000)
}

fn test_attributes() -> CookieAttributes {
    CookieAttributes::new("aars", "/", None, 3600, true, SameSite::Lax)
        .expect("test cookie attributes are valid")
}

pub(crate) fn memory_gate_with_secrets(
    signing_secret: &str,
    encryption_secret: Option<&str>,
) -> (SessionGate, Arc<InMemorySessionStore>) {
    let store = Arc::new(InMemorySessionStore::new());
    let gate = SessionGate::new(
        CookieCodec::from_secrets(signing_secret, encryption_secret),
        test_attributes(),
        store.clone(),
        Duration::from_secs(10),
    );
    (gate, store)
}

pub(crate) fn memory_gate() -> (SessionGate, Arc<InMemorySessionStore>) {
    memory_gate_with_secrets("test signing secret", None)
}

/// A store that never answers
struct StalledSessionStore;

#[async_trait]
impl SessionStore for StalledSessionStore {
    async fn ping(&self) -> Result<(), StoreError> {
        std::future::pending().await
    }

    async fn get(&self, _session_id: &str) -> Result<Option<SessionRecord>, StoreError> {
        std::future::pending().await
    }

    async fn delete(&self, _session_id: &str) -> Result<bool, StoreError> {
        std::future::pending().await
    }
}

pub(crate) fn stalled_gate(timeout: Duration) -> SessionGate {
    SessionGate::new(
        CookieCodec::from_secrets("test signing secret", None),
        test_attributes(),
        Arc::new(StalledSessionStore),
        timeout,
    )
}

/// Request headers carrying `user_agent` and a cookie minted by `gate`
pub(crate) fn request_headers(
    gate: &SessionGate,
    user_agent: Option<&str>,
    payload: Option<&SessionPayload>,
) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Some(user_agent) = user_agent {
        headers.insert(
            USER_AGENT,
            HeaderValue::from_bytes(user_agent.as_bytes()).expect("valid user agent"),
        );
    }
    if let Some(payload) = payload {
        let value = gate.codec().encode(payload).expect("payload encodes");
        headers.insert(
            COOKIE,
            format!("theme=dark; {}={value}", gate.attributes().name())
                .parse()
                .expect("valid cookie header"),
        );
    }
    headers
}
