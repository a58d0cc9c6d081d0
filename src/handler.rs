use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form, Json,
};
use serde_json::json;
use tower_cookies::{cookie::SameSite, Cookie, Cookies};

use crate::{
    error::{AppError, AuthError},
    middleware::SESSION_COOKIE,
    model::CurrentUser,
    schema::{AddTodoSchema, LoginSchema, RegisterSchema},
    views, AppState,
};

// Handler for the health checker route
pub async fn health_checker_handler(
    State(data): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let user_count = data.auth.user_count().await?;

    let json_response = json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "authenticated_users": user_count,
    });

    Ok(Json(json_response))
}

// Home page listing the user's todos
pub async fn index(
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Html<String>, AppError> {
    let todos = data.todos.list(&user.id).await?;
    tracing::debug!(user_id = %user.id, "Loading home page with {} todos", todos.len());

    Ok(Html(views::index_page(&user, &todos)))
}

pub async fn add_todo(
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Form(body): Form<AddTodoSchema>,
) -> Result<Redirect, AppError> {
    data.todos.add(&user.id, &body.todo).await?;
    Ok(Redirect::to("/"))
}

// Ids that are not numbers cannot match any item.
fn parse_todo_id(raw: &str) -> Option<u64> {
    raw.parse().ok()
}

pub async fn complete_todo(
    Path(id): Path<String>,
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Redirect, AppError> {
    if let Some(id) = parse_todo_id(&id) {
        data.todos.complete(&user.id, id).await?;
    }
    Ok(Redirect::to("/"))
}

pub async fn delete_todo(
    Path(id): Path<String>,
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Redirect, AppError> {
    if let Some(id) = parse_todo_id(&id) {
        data.todos.delete(&user.id, id).await?;
    }
    Ok(Redirect::to("/"))
}

// JSON view of all the user's todos
pub async fn get_todos(
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse, AppError> {
    let todos = data.todos.list(&user.id).await?;

    let json_response = json!({
        "status": "success",
        "results": todos.len(),
        "todos": todos,
    });
    Ok((StatusCode::OK, Json(json_response)))
}

// JSON view of a single todo
pub async fn get_todo(
    Path(id): Path<String>,
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Response, AppError> {
    let todo = match parse_todo_id(&id) {
        Some(todo_id) => data.todos.get(&user.id, todo_id).await?,
        None => None,
    };

    let response = match todo {
        Some(todo) => {
            let todo_response = json!({"status": "success", "data": json!({
                "todo": todo
            })});
            (StatusCode::OK, Json(todo_response)).into_response()
        }
        None => {
            let error_response = json!({
                "status": "fail",
                "message": format!("Todo with ID: {} not found", id)
            });
            (StatusCode::NOT_FOUND, Json(error_response)).into_response()
        }
    };
    Ok(response)
}

pub async fn login_page(State(data): State<Arc<AppState>>, cookies: Cookies) -> Response {
    if current_user(&data, &cookies).await.is_some() {
        return Redirect::to("/").into_response();
    }
    Html(views::login_page(None, "")).into_response()
}

pub async fn login(
    State(data): State<Arc<AppState>>,
    cookies: Cookies,
    Form(body): Form<LoginSchema>,
) -> Result<Response, AppError> {
    match data.auth.login(&body.username, &body.password).await {
        Ok(cookie_value) => {
            cookies.add(session_cookie(cookie_value));
            Ok(Redirect::to("/").into_response())
        }
        Err(AuthError::InvalidCredentials) => {
            let message = AuthError::InvalidCredentials.to_string();
            Ok(Html(views::login_page(Some(&message), &body.username)).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn register_page(State(data): State<Arc<AppState>>, cookies: Cookies) -> Response {
    if current_user(&data, &cookies).await.is_some() {
        return Redirect::to("/").into_response();
    }
    Html(views::register_page(None, "")).into_response()
}

pub async fn register(
    State(data): State<Arc<AppState>>,
    Form(body): Form<RegisterSchema>,
) -> Result<Response, AppError> {
    let result = data
        .auth
        .register(&body.username, &body.password, &body.confirm_password)
        .await;

    match result {
        Ok(_) => Ok(Redirect::to("/login").into_response()),
        Err(AuthError::Validation(e)) => {
            let message = e.to_string();
            Ok(Html(views::register_page(Some(&message), body.username.trim())).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn logout(State(data): State<Arc<AppState>>, cookies: Cookies) -> Redirect {
    if let Some(cookie) = cookies.get(SESSION_COOKIE) {
        data.auth.logout(cookie.value()).await;

        let mut removal = Cookie::named(SESSION_COOKIE);
        removal.set_path("/");
        cookies.remove(removal);
    }
    Redirect::to("/login")
}

async fn current_user(data: &AppState, cookies: &Cookies) -> Option<CurrentUser> {
    let cookie = cookies.get(SESSION_COOKIE)?;
    data.auth.resolve(cookie.value()).await
}

fn session_cookie(value: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, value);
    cookie.set_http_only(true);
    cookie.set_path("/");
    cookie.set_same_site(SameSite::Lax);
    cookie
}
