use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_cookies::CookieManagerLayer;
use tower_http::trace::TraceLayer;

use crate::{handler::*, middleware::mw_require_auth, AppState};

pub fn create_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/add", post(add_todo))
        .route("/complete/:id", get(complete_todo))
        .route("/delete/:id", get(delete_todo))
        .route("/api/todos", get(get_todos))
        .route("/api/todos/:id", get(get_todo))
        .route_layer(from_fn_with_state(app_state.clone(), mw_require_auth))
        .route("/login", get(login_page).post(login))
        .route("/register", get(register_page).post(register))
        .route("/logout", get(logout))
        .route("/health", get(health_checker_handler))
        .layer(CookieManagerLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
