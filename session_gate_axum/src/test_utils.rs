//! Shared helpers for router tests, built on the in-memory session store

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use session_gate::{
    CookieAttributes, CookieCodec, InMemorySessionStore, SameSite, SessionGate, SessionPayload,
};

use crate::GateState;

pub(crate) const TEST_REDIRECT_URL: &str = "https://login.example.com/start";

pub(crate) fn test_state() -> (GateState, Arc<InMemorySessionStore>) {
    let store = Arc::new(InMemorySessionStore::new());
    let gate = SessionGate::new(
        CookieCodec::from_secrets("router test secret", Some("router test encryption")),
        CookieAttributes::new("aars", "/", None, 3600, false, SameSite::Lax)
            .expect("valid cookie attributes"),
        store.clone(),
        Duration::from_secs(1),
    );
    (GateState::new(gate, "Gated Title", TEST_REDIRECT_URL), store)
}

pub(crate) fn sample_payload(user_agent: &str) -> SessionPayload {
    SessionPayload::new("google", "sid-42", user_agent, 1_700_000_000)
}

/// `Cookie` header value carrying `payload` for `state`'s gate
pub(crate) fn session_cookie(state: &GateState, payload: &SessionPayload) -> String {
    let value = state.gate.codec().encode(payload).expect("payload encodes");
    format!("{}={value}", state.gate.attributes().name())
}

pub(crate) fn missing_resources() -> PathBuf {
    std::env::temp_dir().join("session-gate-axum-no-such-resources")
}
