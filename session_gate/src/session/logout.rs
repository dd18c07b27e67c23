use http::HeaderMap;

use crate::store::StoreError;

use super::gate::SessionGate;
use super::types::{LogoutOutcome, LogoutResponse};

impl SessionGate {
    /// Clear the session cookie and delete the session record.
    ///
    /// Never fails from the caller's point of view: every outcome ends on the
    /// redirect page. Store deletion is best effort; when it fails the record
    /// stays until the store expires it, while the cleared cookie already
    /// keeps this browser out.
    #[tracing::instrument(skip_all)]
    pub async fn logout(&self, headers: &HeaderMap) -> LogoutResponse {
        let Some(session_id) = self
            .session_from_headers(headers)
            .map(|payload| payload.session_id)
            .filter(|id| !id.is_empty())
        else {
            tracing::debug!("No session to log out");
            return LogoutResponse::new(LogoutOutcome::NoSession);
        };

        let mut response = LogoutResponse::new(LogoutOutcome::LoggedOut);
        if let Err(e) = self.attributes.clear_cookie_header(&mut response.headers) {
            tracing::error!("Can not clear session cookie: {}", e);
            return LogoutResponse::new(LogoutOutcome::CookieNotCleared);
        }

        let result = tokio::time::timeout(self.store_timeout, self.store.delete(&session_id))
            .await
            .unwrap_or(Err(StoreError::Timeout));
        match result {
            Ok(true) => tracing::debug!("Deleted session {} from store", session_id),
            Ok(false) => tracing::debug!("Session {} was already gone from store", session_id),
            Err(e) => {
                tracing::error!(
                    "Can not delete session information from store (sessionId = {}): {}",
                    session_id,
                    e
                );
                response.outcome = LogoutOutcome::StoreDeleteFailed;
            }
        }
        response
    }
}
