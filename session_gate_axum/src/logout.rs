use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use http::HeaderMap;

use session_gate::LogoutResponse;

use super::pages::redirect_page;
use super::state::GateState;

/// Ends the session and always answers with the redirect page
pub(crate) async fn logout(State(state): State<GateState>, headers: HeaderMap) -> Response {
    let LogoutResponse {
        headers: cookie_headers,
        outcome,
    } = state.gate.logout(&headers).await;
    tracing::debug!("Logout finished: {:?}", outcome);
    (cookie_headers, redirect_page(&state)).into_response()
}
