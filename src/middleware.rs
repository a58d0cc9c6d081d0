use std::sync::Arc;

use axum::{
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_cookies::Cookies;

use crate::AppState;

/// Cookie holding the signed session token
pub const SESSION_COOKIE: &str = "todo_session";

/// Let the request through only with a live session; otherwise send the
/// browser to the login page. The resolved `CurrentUser` is stored in the
/// request extensions for the handlers.
pub async fn mw_require_auth<B>(
    State(data): State<Arc<AppState>>,
    cookies: Cookies,
    mut request: Request<B>,
    next: Next<B>,
) -> Response {
    let current_user = match cookies.get(SESSION_COOKIE) {
        Some(cookie) => data.auth.resolve(cookie.value()).await,
        None => None,
    };

    let Some(current_user) = current_user else {
        tracing::debug!("No valid session for {}, redirecting", request.uri());
        return Redirect::to("/login").into_response();
    };

    request.extensions_mut().insert(current_user);
    next.run(request).await
}
