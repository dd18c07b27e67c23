use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use http::header::CACHE_CONTROL;

use super::state::GateState;

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate<'a> {
    title: &'a str,
}

#[derive(Template)]
#[template(path = "redirect.html")]
struct RedirectTemplate<'a> {
    title: &'a str,
    redirect_url: &'a str,
}

fn render_html(template: impl Template) -> Response {
    match template.render() {
        Ok(html) => ([(CACHE_CONTROL, "no-store")], Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Can not render page: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

pub(crate) async fn index(State(state): State<GateState>) -> Response {
    render_html(IndexTemplate {
        title: &state.title,
    })
}

/// The page every denied or logged out visitor gets
pub(crate) fn redirect_page(state: &GateState) -> Response {
    render_html(RedirectTemplate {
        title: &state.title,
        redirect_url: &state.redirect_url,
    })
}

/// Response for a denied request.
///
/// The same redirect page whatever check failed.
pub(crate) fn deny_response(state: &GateState) -> Response {
    redirect_page(state)
}
