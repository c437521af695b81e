use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use tracing::warn;

use super::{pages, AppState, CurrentSession};
use crate::controllers::auth::{self, AuthFlowError, FieldErrors, LoginForm, RegisterForm};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page).post(login_post))
        .route("/register", get(register_page).post(register_post))
        .route("/logout", post(logout))
}

/// GET /login - Show login form.
async fn login_page(session: CurrentSession) -> Response {
    if session.0.is_authenticated() {
        return session.respond(Redirect::to("/"));
    }
    let html = pages::render_login_page(&LoginForm::default(), &FieldErrors::new(), None);
    session.respond(Html(html.into_string()))
}

/// POST /login - Validate, log in and start the session.
async fn login_post(
    State(state): State<AppState>,
    mut session: CurrentSession,
    Form(form): Form<LoginForm>,
) -> Response {
    match auth::login(state.hooks.client(), &mut session.0, &form).await {
        Ok(()) => session.respond(Redirect::to("/")),
        Err(e) => {
            warn!(email = %form.email, "Login rejected: {e}");
            let html = render_login_error(&form, &e);
            session.respond(failure_status(&e, Html(html)))
        }
    }
}

/// GET /register - Show registration form.
async fn register_page(session: CurrentSession) -> Response {
    if session.0.is_authenticated() {
        return session.respond(Redirect::to("/"));
    }
    let html = pages::render_register_page(&RegisterForm::default(), &FieldErrors::new(), None);
    session.respond(Html(html.into_string()))
}

/// POST /register - Register, remember the name, then log in.
async fn register_post(
    State(state): State<AppState>,
    mut session: CurrentSession,
    Form(form): Form<RegisterForm>,
) -> Response {
    match auth::register(state.hooks.client(), &mut session.0, &form).await {
        Ok(()) => session.respond(Redirect::to("/")),
        Err(e) => {
            warn!(email = %form.email, "Registration rejected: {e}");
            let empty = FieldErrors::new();
            let errors = e.field_errors().unwrap_or(&empty);
            let html = pages::render_register_page(&form, errors, e.user_message(true))
                .into_string();
            // A failed follow-up login still leaves the profile book updated
            session.respond(failure_status(&e, Html(html)))
        }
    }
}

/// POST /logout - Clear the session.
async fn logout(mut session: CurrentSession) -> Response {
    session.0.logout();
    session.respond(Redirect::to("/"))
}

fn render_login_error(form: &LoginForm, error: &AuthFlowError) -> String {
    let empty = FieldErrors::new();
    let errors = error.field_errors().unwrap_or(&empty);
    pages::render_login_page(form, errors, error.user_message(false)).into_string()
}

fn failure_status(error: &AuthFlowError, body: Html<String>) -> Response {
    let status = match error {
        AuthFlowError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AuthFlowError::Register(_) => StatusCode::BAD_REQUEST,
        AuthFlowError::Login(_) => StatusCode::UNAUTHORIZED,
    };
    (status, body).into_response()
}
