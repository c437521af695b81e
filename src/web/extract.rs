//! Request extractors.

use std::convert::Infallible;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};

use super::AppState;
use crate::session::{CookieStorage, Session};

/// The visitor's session, read from request cookies.
///
/// Never rejects: missing or corrupt cookies give an anonymous session.
/// Handlers pass the session back through [`CurrentSession::respond`] so
/// that any cookie changes (including clearing a corrupt record) reach the
/// browser.
#[derive(Debug)]
pub struct CurrentSession(pub Session<CookieStorage>);

#[async_trait]
impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let storage = CookieStorage::from_headers(&parts.headers, state.config.secure_cookies);
        Ok(Self(Session::load(storage)))
    }
}

impl CurrentSession {
    /// Attach pending `Set-Cookie` headers to `response`.
    pub fn respond(self, response: impl IntoResponse) -> Response {
        let mut response = response.into_response();
        let storage = self.0.into_storage();
        if storage.has_changes() {
            storage.write_to(response.headers_mut());
        }
        response
    }
}
