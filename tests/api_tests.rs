/// HTTP tests covering full request/response cycles through the router
mod common;

use axum::http::{header, StatusCode};
use common::*;

#[tokio::test]
async fn test_health_check_is_public() {
    let (app, _dir) = create_test_app().await;

    let response = send(&app, get("/health", None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["authenticated_users"], 0);
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_health_counts_registered_users() {
    let (app, _dir) = create_test_app().await;
    register_and_login(&app, "alice", "secret1").await;
    register_and_login(&app, "bob", "secret2").await;

    let response = send(&app, get("/health", None)).await;
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["authenticated_users"], 2);
}

#[tokio::test]
async fn test_todo_routes_redirect_to_login_without_session() {
    let (app, _dir) = create_test_app().await;

    for request in [
        get("/", None),
        get("/complete/1", None),
        get("/delete/1", None),
        get("/api/todos", None),
        post_form("/add", "todo=Buy+milk", None),
        get("/", Some("todo_session=forged.signature")),
    ] {
        let response = send(&app, request).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/login");
    }
}

#[tokio::test]
async fn test_login_and_register_pages_render() {
    let (app, _dir) = create_test_app().await;

    let response = send(&app, get("/login", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains(r#"action="/login""#));

    let response = send(&app, get("/register", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("confirm_password"));
}

#[tokio::test]
async fn test_logged_in_user_skips_login_page() {
    let (app, _dir) = create_test_app().await;
    let cookie = register_and_login(&app, "alice", "secret1").await;

    let response = send(&app, get("/login", Some(&cookie))).await;
    assert_eq!(location(&response), "/");

    let response = send(&app, get("/register", Some(&cookie))).await;
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn test_register_validation_errors_are_shown() {
    let (app, _dir) = create_test_app().await;

    let cases = [
        ("username=&password=secret1&confirm_password=secret1", "All fields are required"),
        ("username=al&password=secret1&confirm_password=secret1", "at least 3 characters"),
        ("username=alice&password=123&confirm_password=123", "at least 6 characters"),
        ("username=alice&password=secret1&confirm_password=secret2", "Passwords do not match"),
    ];
    for (form, message) in cases {
        let response = send(&app, post_form("/register", form, None)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.contains(message), "{form}");
    }
}

#[tokio::test]
async fn test_duplicate_username_is_rejected_ignoring_case() {
    let (app, _dir) = create_test_app().await;
    register_and_login(&app, "alice", "secret1").await;

    let form = "username=ALICE&password=secret9&confirm_password=secret9";
    let response = send(&app, post_form("/register", form, None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("Username already exists"));
    assert!(body.contains(r#"value="ALICE""#));
}

#[tokio::test]
async fn test_wrong_password_fails_login() {
    let (app, _dir) = create_test_app().await;
    register_and_login(&app, "alice", "secret1").await;

    for form in ["username=alice&password=wrong11", "username=nobody&password=secret1"] {
        let response = send(&app, post_form("/login", form, None)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(session_cookie(&response).is_none());
        assert!(body_string(response)
            .await
            .contains("Invalid username or password"));
    }
}

#[tokio::test]
async fn test_session_cookie_is_http_only() {
    let (app, _dir) = create_test_app().await;
    send(
        &app,
        post_form(
            "/register",
            "username=alice&password=secret1&confirm_password=secret1",
            None,
        ),
    )
    .await;

    let response = send(
        &app,
        post_form("/login", "username=alice&password=secret1", None),
    )
    .await;
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("Path=/"));
}

#[tokio::test]
async fn test_add_complete_delete_flow() {
    let (app, _dir) = create_test_app().await;
    let cookie = register_and_login(&app, "alice", "secret1").await;

    let response = send(&app, post_form("/add", "todo=Buy+milk", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let response = send(&app, get("/", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_string(response).await;
    assert!(page.contains("Buy milk"));
    assert!(page.contains("/complete/1"));

    let response = send(&app, get("/api/todos", Some(&cookie))).await;
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["results"], 1);
    assert_eq!(body["todos"][0]["text"], "Buy milk");
    assert_eq!(body["todos"][0]["completed"], false);

    send(&app, get("/complete/1", Some(&cookie))).await;
    let response = send(&app, get("/api/todos/1", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["data"]["todo"]["completed"], true);
    assert!(body["data"]["todo"]["completed_at"].is_string());

    let response = send(&app, get("/delete/1", Some(&cookie))).await;
    assert_eq!(location(&response), "/");
    let response = send(&app, get("/api/todos/1", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_ids_are_ignored() {
    let (app, _dir) = create_test_app().await;
    let cookie = register_and_login(&app, "alice", "secret1").await;
    send(&app, post_form("/add", "todo=Keep+me", Some(&cookie))).await;

    for uri in ["/complete/99", "/delete/99"] {
        let response = send(&app, get(uri, Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    let response = send(&app, get("/api/todos", Some(&cookie))).await;
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["results"], 1);
    assert_eq!(body["todos"][0]["completed"], false);
}

#[tokio::test]
async fn test_non_numeric_ids_are_handled() {
    let (app, _dir) = create_test_app().await;
    let cookie = register_and_login(&app, "alice", "secret1").await;
    send(&app, post_form("/add", "todo=Keep+me", Some(&cookie))).await;

    for uri in ["/complete/abc", "/delete/abc", "/delete/-1"] {
        let response = send(&app, get(uri, Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(location(&response), "/");
    }

    let response = send(&app, get("/api/todos/abc", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["status"], "fail");
    assert_eq!(body["message"], "Todo with ID: abc not found");

    let response = send(&app, get("/api/todos", Some(&cookie))).await;
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["results"], 1);
    assert_eq!(body["todos"][0]["completed"], false);
}

#[tokio::test]
async fn test_login_with_padded_username() {
    let (app, _dir) = create_test_app().await;

    let form = "username=+alice+&password=secret1&confirm_password=secret1";
    let response = send(&app, post_form("/register", form, None)).await;
    assert_eq!(location(&response), "/login");

    let response = send(
        &app,
        post_form("/login", "username=+alice+&password=secret1", None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    let cookie = session_cookie(&response).unwrap();

    let page = body_string(send(&app, get("/", Some(&cookie))).await).await;
    assert!(page.contains(r#"<div class="nav">alice | "#));
}

#[tokio::test]
async fn test_blank_todo_is_not_added() {
    let (app, _dir) = create_test_app().await;
    let cookie = register_and_login(&app, "alice", "secret1").await;

    for form in ["todo=", "todo=+++", ""] {
        let response = send(&app, post_form("/add", form, Some(&cookie))).await;
        assert_eq!(location(&response), "/");
    }

    let response = send(&app, get("/api/todos", Some(&cookie))).await;
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["results"], 0);
}

#[tokio::test]
async fn test_users_only_see_their_own_todos() {
    let (app, _dir) = create_test_app().await;
    let alice = register_and_login(&app, "alice", "secret1").await;
    let bob = register_and_login(&app, "bob", "secret2").await;

    send(&app, post_form("/add", "todo=Alice+task", Some(&alice))).await;
    send(&app, post_form("/add", "todo=Bob+task", Some(&bob))).await;

    let page = body_string(send(&app, get("/", Some(&alice))).await).await;
    assert!(page.contains("Alice task"));
    assert!(!page.contains("Bob task"));

    let page = body_string(send(&app, get("/", Some(&bob))).await).await;
    assert!(page.contains("Bob task"));
    assert!(!page.contains("Alice task"));

    // Bob deleting id 1 only touches his own list.
    send(&app, get("/delete/1", Some(&bob))).await;
    let page = body_string(send(&app, get("/", Some(&alice))).await).await;
    assert!(page.contains("Alice task"));
}

#[tokio::test]
async fn test_logout_ends_session() {
    let (app, _dir) = create_test_app().await;
    let cookie = register_and_login(&app, "alice", "secret1").await;

    let response = send(&app, get("/logout", Some(&cookie))).await;
    assert_eq!(location(&response), "/login");

    let response = send(&app, get("/", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_sqlite_backend_flow() {
    let app = create_sqlite_test_app().await;
    let alice = register_and_login(&app, "alice", "secret1").await;
    let bob = register_and_login(&app, "bob", "secret2").await;

    send(&app, post_form("/add", "todo=Buy+milk", Some(&alice))).await;
    send(&app, get("/complete/1", Some(&alice))).await;

    let response = send(&app, get("/api/todos", Some(&alice))).await;
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["results"], 1);
    assert_eq!(body["todos"][0]["completed"], true);

    let response = send(&app, get("/api/todos", Some(&bob))).await;
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["results"], 0);

    let response = send(&app, get("/health", None)).await;
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["authenticated_users"], 2);
}
