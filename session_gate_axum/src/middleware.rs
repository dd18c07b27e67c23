use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use session_gate::Decision;

use super::pages::deny_response;
use super::session::ValidSession;
use super::state::GateState;

/// Lets the request through only when its session validates.
///
/// Denied requests get the redirect page whatever check failed; the reason
/// is only logged.
pub async fn require_session(
    State(state): State<GateState>,
    mut req: Request,
    next: Next,
) -> Response {
    match state.gate.validate(req.headers()).await {
        Decision::Allow(payload) => {
            req.extensions_mut().insert(ValidSession(payload));
            next.run(req).await
        }
        Decision::Deny(reason) => {
            tracing::debug!("Denied {} {}: {}", req.method(), req.uri().path(), reason);
            deny_response(&state)
        }
    }
}
