use http::HeaderMap;
use http::header::USER_AGENT;

use crate::cookie::SessionPayload;
use crate::store::StoreError;

use super::gate::SessionGate;
use super::types::{Decision, DenyReason};

impl SessionGate {
    /// Decide whether the request may see protected content.
    ///
    /// Checks run cheapest first and stop at the first failure: user agent
    /// header, cookie, user agent binding, then one store lookup. Nothing is
    /// mutated.
    #[tracing::instrument(skip_all)]
    pub async fn validate(&self, headers: &HeaderMap) -> Decision {
        let payload = match self.check_local(headers) {
            Ok(payload) => payload,
            Err(reason) => return deny(reason),
        };

        match self.lookup_session(&payload.session_id).await {
            Ok(()) => {
                tracing::debug!(
                    "Session {} allowed (auth type {}, created {:?})",
                    payload.session_id,
                    payload.auth_type,
                    payload.created_at()
                );
                Decision::Allow(payload)
            }
            Err(reason) => deny(reason),
        }
    }

    /// The checks that need no store round-trip
    pub(super) fn check_local(&self, headers: &HeaderMap) -> Result<SessionPayload, DenyReason> {
        let header_user_agent = headers
            .get(USER_AGENT)
            .map(|v| v.as_bytes())
            .filter(|ua| !ua.is_empty())
            .ok_or(DenyReason::MissingUserAgent)?;

        let cookie = self
            .attributes
            .read_from(headers)
            .ok_or(DenyReason::MissingCookie)?;
        let payload = self
            .codec
            .decode(&cookie)
            .ok_or(DenyReason::InvalidCookie)?;
        if !payload.is_complete() {
            return Err(DenyReason::IncompleteSession);
        }

        if header_user_agent != payload.user_agent.as_bytes() {
            return Err(DenyReason::UserAgentMismatch);
        }

        Ok(payload)
    }

    async fn lookup_session(&self, session_id: &str) -> Result<(), DenyReason> {
        let result = tokio::time::timeout(self.store_timeout, self.store.get(session_id))
            .await
            .unwrap_or(Err(StoreError::Timeout));

        match result {
            Ok(Some(_)) => Ok(()),
            Ok(None) => Err(DenyReason::SessionNotFound),
            Err(StoreError::Timeout) => {
                tracing::warn!("Session lookup timed out (sessionId = {})", session_id);
                Err(DenyReason::StoreTimeout)
            }
            Err(e) => {
                tracing::warn!(
                    "Can not get session information from store (sessionId = {}): {}",
                    session_id,
                    e
                );
                Err(DenyReason::StoreUnavailable)
            }
        }
    }
}

fn deny(reason: DenyReason) -> Decision {
    tracing::debug!("Session denied: {}", reason);
    Decision::Deny(reason)
}
