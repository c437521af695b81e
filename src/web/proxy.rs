//! Pass-through GET routes to the backend's post listings.
//!
//! The query string is forwarded unchanged and the upstream status, body
//! and content type are relayed as received.

use axum::extract::State;
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tracing::{debug, error};

use super::AppState;
use crate::config::{trim_base_url, BACKEND_API_BASE_URL};

/// Listing forwarded by a proxy route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing {
    Recommended,
    MostLiked,
}

impl Listing {
    /// Path segment under `/posts/` on the backend.
    #[must_use]
    pub const fn segment(self) -> &'static str {
        match self {
            Self::Recommended => "recommended",
            Self::MostLiked => "most-liked",
        }
    }

    const fn failure_message(self) -> &'static str {
        match self {
            Self::Recommended => "Failed to fetch recommended posts from backend.",
            Self::MostLiked => "Failed to fetch most liked posts from backend.",
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/posts/recommended", get(recommended))
        .route("/api/posts/most-liked", get(most_liked))
}

async fn recommended(State(state): State<AppState>, uri: Uri) -> Response {
    forward(&state, Listing::Recommended, &uri).await
}

async fn most_liked(State(state): State<AppState>, uri: Uri) -> Response {
    forward(&state, Listing::MostLiked, &uri).await
}

fn json_error(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "message": message })),
    )
        .into_response()
}

async fn forward(state: &AppState, listing: Listing, uri: &Uri) -> Response {
    let Some(base) = state.config.backend_api_base_url.as_deref() else {
        error!("{BACKEND_API_BASE_URL} is not defined");
        return json_error(&format!(
            "{BACKEND_API_BASE_URL} is not configured on the server. Please set it in the environment or .env file."
        ));
    };

    let search = uri.query().map(|q| format!("?{q}")).unwrap_or_default();
    let target = format!("{}/posts/{}{search}", trim_base_url(base), listing.segment());
    debug!(target = %target, "Proxying listing request");

    let upstream = match state
        .http
        .get(&target)
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .await
    {
        Ok(res) => res,
        Err(e) => {
            error!(listing = listing.segment(), "Error proxying /posts/{}: {e}", listing.segment());
            return json_error(listing.failure_message());
        }
    };

    let status = StatusCode::from_u16(upstream.status().as_u16())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let content_type = upstream
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/json")
        .to_string();

    match upstream.bytes().await {
        Ok(body) => (status, [(header::CONTENT_TYPE, content_type)], body).into_response(),
        Err(e) => {
            error!(listing = listing.segment(), "Error reading /posts/{} body: {e}", listing.segment());
            json_error(listing.failure_message())
        }
    }
}
