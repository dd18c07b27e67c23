use axum::{
    extract::{FromRef, FromRequestParts},
    response::Response,
};
use http::request::Parts;

use session_gate::{Decision, SessionPayload};

use super::pages::deny_response;
use super::state::GateState;

/// Verified session of the current request, available as an Axum extractor
///
/// Behind [`crate::require_session`] the payload is taken from the request
/// extensions; elsewhere the extractor validates the request itself and
/// rejects with the same response the middleware would give.
///
/// # Example
///
/// ```no_run
/// use axum::{routing::get, Router};
/// use session_gate_axum::{GateState, ValidSession};
///
/// async fn whoami(ValidSession(session): ValidSession) -> String {
///     format!("signed in via {}", session.auth_type)
/// }
///
/// fn routes(state: GateState) -> Router {
///     Router::new().route("/whoami", get(whoami)).with_state(state)
/// }
/// ```
#[derive(Clone, Debug)]
pub struct ValidSession(pub SessionPayload);

impl<S> FromRequestParts<S> for ValidSession
where
    GateState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(session) = parts.extensions.get::<ValidSession>() {
            return Ok(session.clone());
        }

        let state = GateState::from_ref(state);
        match state.gate.validate(&parts.headers).await {
            Decision::Allow(payload) => Ok(ValidSession(payload)),
            Decision::Deny(reason) => {
                tracing::debug!("Rejecting extractor: {}", reason);
                Err(deny_response(&state))
            }
        }
    }
}
