/// Common test utilities and fixtures
use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use chrono::Duration;
use tempfile::TempDir;
use todo_web_app::{
    auth::{PasswordHasher, SessionStore},
    create_router,
    store::{JsonStore, SqliteStore, Store},
    AppState,
};
use tower::util::ServiceExt;

/// Router over a JSON store in a fresh temp directory
pub async fn create_test_app() -> (Router, TempDir) {
    let dir = TempDir::new().unwrap();
    let store = Store::Json(JsonStore::open(dir.path()).await.unwrap());
    (router_for(store), dir)
}

/// Router over an in-memory SQLite store
pub async fn create_sqlite_test_app() -> Router {
    let store = Store::Sqlite(SqliteStore::connect("sqlite::memory:").await.unwrap());
    router_for(store)
}

fn router_for(store: Store) -> Router {
    let app_state = AppState::new(
        store,
        PasswordHasher::new(1_000),
        SessionStore::new(b"test-secret-key", Duration::hours(1)),
    );
    create_router(Arc::new(app_state))
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<axum::body::BoxBody> {
    app.clone().oneshot(request).await.unwrap()
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri).method("GET");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, form: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .uri(uri)
        .method("POST")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(form.to_string())).unwrap()
}

pub async fn body_string(response: Response<axum::body::BoxBody>) -> String {
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn location(response: &Response<axum::body::BoxBody>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// Register and log in, returning the `name=value` pair to send back as a
/// `Cookie` header.
pub async fn register_and_login(app: &Router, username: &str, password: &str) -> String {
    let form = format!("username={username}&password={password}&confirm_password={password}");
    let response = send(app, post_form("/register", &form, None)).await;
    assert_eq!(location(&response), "/login");

    let form = format!("username={username}&password={password}");
    let response = send(app, post_form("/login", &form, None)).await;
    assert_eq!(location(&response), "/");

    session_cookie(&response).expect("login sets a session cookie")
}

pub fn session_cookie(response: &Response<axum::body::BoxBody>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("todo_session="))
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}
