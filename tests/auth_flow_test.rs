//! Integration tests for login and registration.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use inkwell::api::ApiClient;
use inkwell::config::Config;
use inkwell::controllers::auth::{self, AuthFlowError, LoginForm, RegisterForm};
use inkwell::session::{profiles, DisplayProfile, MemoryStorage, Session};
use inkwell::web::{create_app, AppState};
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> ApiClient {
    ApiClient::with_http(reqwest::Client::new(), Some(&server.uri()), &server.uri())
}

fn register_form(name: &str, email: &str) -> RegisterForm {
    RegisterForm {
        name: name.to_string(),
        email: email.to_string(),
        password: "secret1".to_string(),
        confirm_password: "secret1".to_string(),
    }
}

async fn mount_register(server: &MockServer, email: &str) {
    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .and(body_partial_json(json!({"email": email, "password": "secret1"})))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"id": 7, "email": email, "username": "ana"})),
        )
        .mount(server)
        .await;
}

async fn mount_login(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": token})))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_register_then_login_uses_chosen_name() {
    let server = MockServer::start().await;
    mount_register(&server, "ana@x.com").await;
    mount_login(&server, "tok-ana").await;

    let mut session = Session::load(MemoryStorage::new());
    auth::register(&client(&server), &mut session, &register_form("Ana", "ana@x.com"))
        .await
        .unwrap();

    let user = session.user().expect("logged in");
    assert_eq!(user.email, "ana@x.com");
    assert_eq!(user.token, "tok-ana");
    assert_eq!(user.display_name(), "Ana");
    assert_eq!(
        profiles::lookup(session.storage(), "ana@x.com"),
        Some(DisplayProfile::named("Ana"))
    );
}

#[tokio::test]
async fn test_later_login_backfills_name_from_profile_book() {
    let server = MockServer::start().await;
    mount_login(&server, "tok-2").await;

    let mut storage = MemoryStorage::new();
    profiles::remember(&mut storage, "ana@x.com", DisplayProfile::named("Ana"));
    let mut session = Session::load(storage);

    let form = LoginForm {
        email: "ana@x.com".to_string(),
        password: "secret1".to_string(),
    };
    auth::login(&client(&server), &mut session, &form).await.unwrap();

    assert_eq!(session.user().and_then(|u| u.name.as_deref()), Some("Ana"));
    assert_eq!(session.token(), Some("tok-2"));
}

#[tokio::test]
async fn test_invalid_form_never_reaches_backend() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut session = Session::load(MemoryStorage::new());
    let mut form = register_form("Ana", "ana@x.com");
    form.confirm_password = "other".to_string();

    let err = auth::register(&client(&server), &mut session, &form)
        .await
        .unwrap_err();

    let errors = err.field_errors().expect("field errors");
    assert_eq!(
        errors.get("confirm_password"),
        Some(&"Confirm password does not match password")
    );
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_rejected_login_keeps_session_anonymous() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid credentials"})),
        )
        .mount(&server)
        .await;

    let mut session = Session::load(MemoryStorage::new());
    let form = LoginForm {
        email: "ghost@x.com".to_string(),
        password: "nope".to_string(),
    };
    let err = auth::login(&client(&server), &mut session, &form)
        .await
        .unwrap_err();

    assert!(matches!(err, AuthFlowError::Login(_)));
    assert_eq!(err.user_message(false), Some("Login failed. User not found."));
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_failed_follow_up_login_still_remembers_name() {
    let server = MockServer::start().await;
    mount_register(&server, "ana@x.com").await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut session = Session::load(MemoryStorage::new());
    let err = auth::register(&client(&server), &mut session, &register_form("Ana", "ana@x.com"))
        .await
        .unwrap_err();

    assert_eq!(err.user_message(true), Some("Login after registration failed."));
    assert!(!session.is_authenticated());
    assert!(profiles::lookup(session.storage(), "ana@x.com").is_some());
}

fn app(server: &MockServer) -> axum::Router {
    let config = Config {
        public_api_url: Some(server.uri()),
        ..Config::for_testing()
    };
    create_app(AppState::with_http(config, reqwest::Client::new()))
}

fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Decoded `name=value` pairs from the response's `Set-Cookie` headers.
fn cookies(response: &Response) -> Vec<(String, String)> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| {
            let pair = v.split(';').next()?;
            let (name, value) = pair.split_once('=')?;
            let value = urlencoding::decode(value).ok()?.into_owned();
            Some((name.to_string(), value))
        })
        .collect()
}

async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_register_route_sets_session_cookie() {
    let server = MockServer::start().await;
    mount_register(&server, "ana@x.com").await;
    mount_login(&server, "tok-ana").await;

    let body = "name=Ana&email=ana%40x.com&password=secret1&confirm_password=secret1";
    let response = app(&server)
        .oneshot(post_form("/register", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let cookies = cookies(&response);
    let (_, auth) = cookies
        .iter()
        .find(|(name, _)| name == "auth")
        .expect("auth cookie");
    let stored: serde_json::Value = serde_json::from_str(auth).unwrap();
    assert_eq!(stored["name"], "Ana");
    assert_eq!(stored["token"], "tok-ana");
    assert!(cookies.iter().any(|(name, _)| name == "userProfiles"));
}

#[tokio::test]
async fn test_login_route_reports_field_errors() {
    let server = MockServer::start().await;

    let response = app(&server)
        .oneshot(post_form("/login", "email=&password="))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_text(response).await;
    assert!(html.contains("Email required"));
    assert!(html.contains("Password required"));
}

#[tokio::test]
async fn test_login_route_rejected_by_backend() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "nope"})))
        .mount(&server)
        .await;

    let response = app(&server)
        .oneshot(post_form("/login", "email=ghost%40x.com&password=pw"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(cookies(&response).is_empty());
    let html = body_text(response).await;
    assert!(html.contains("Login failed. User not found."));
    // Email is echoed back, the password is not
    assert!(html.contains(r#"value="ghost@x.com""#));
    assert!(!html.contains(r#"value="pw""#));
}
