//! Router for the gated content bundle

use std::path::Path;

use axum::{Router, middleware, routing::get};
use tower_http::LatencyUnit;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use super::logout::logout;
use super::middleware::require_session;
use super::pages::index;
use super::state::GateState;

/// Create the router serving the content bundle under `resource_path`
///
/// The endpoints are:
/// - `/`, `/index.html`: the protected index page, behind the session check
/// - `/auth/logout`: ends the session and shows the redirect page
/// - `/favicon.ico`, `/js`, `/css`, `/img`, `/font`: static assets from `resource_path`
pub fn gate_router(state: GateState, resource_path: impl AsRef<Path>) -> Router {
    gate_router_no_trace(state, resource_path).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(
                DefaultOnResponse::new()
                    .level(Level::INFO)
                    .latency_unit(LatencyUnit::Millis),
            ),
    )
}

/// Same as [`gate_router`] without the HTTP tracing layer.
pub fn gate_router_no_trace(state: GateState, resource_path: impl AsRef<Path>) -> Router {
    let root = resource_path.as_ref();

    let protected = Router::new()
        .route("/", get(index))
        .route("/index.html", get(index))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    Router::new()
        .merge(protected)
        .route("/auth/logout", get(logout))
        .route_service(
            "/favicon.ico",
            ServeFile::new(root.join("icon").join("favicon.ico")),
        )
        .nest_service("/js", ServeDir::new(root.join("js")))
        .nest_service("/css", ServeDir::new(root.join("css")))
        .nest_service("/img", ServeDir::new(root.join("img")))
        .nest_service("/font", ServeDir::new(root.join("font")))
        .with_state(state)
}
