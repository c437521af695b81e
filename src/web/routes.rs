use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;

use super::{pages, AppState, CurrentSession};
use crate::controllers::{DetailController, DetailParams, FeedController, HomeParams};

/// Create the router with the page routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/detail", get(detail))
        .route("/healthz", get(health))
}

async fn home(
    State(state): State<AppState>,
    session: CurrentSession,
    Query(params): Query<HomeParams>,
) -> Response {
    let controller = FeedController::from_params(&params);
    let view = controller.load(&state.hooks).await;
    if let Some(message) = view.posts.error_message() {
        tracing::warn!(query = controller.committed_query(), "Home listing failed: {message}");
    }

    let html = pages::render_home_page(&view, session.0.user());
    session.respond(Html(html.into_string()))
}

async fn detail(
    State(state): State<AppState>,
    session: CurrentSession,
    Query(params): Query<DetailParams>,
) -> Response {
    let controller = DetailController::from_params(&params);
    let view = controller.load(&state.hooks, session.0.user()).await;

    let html = pages::render_detail_page(&view, session.0.user());
    session.respond(Html(html.into_string()))
}

async fn health() -> impl IntoResponse {
    "OK"
}
