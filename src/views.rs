//! HTML pages, written inline without a template engine.

use crate::model::{CurrentUser, TodoItem};

const STYLES: &str = r#"
    body {
        font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Arial, sans-serif;
        max-width: 640px;
        margin: 40px auto;
        padding: 0 20px;
        background: #f5f5f5;
    }
    .container {
        background: white;
        padding: 30px;
        border-radius: 8px;
        box-shadow: 0 2px 4px rgba(0,0,0,0.1);
    }
    h1 { color: #333; border-bottom: 2px solid #0066cc; padding-bottom: 10px; }
    .error { background: #fdecea; color: #b00020; padding: 10px; border-radius: 4px; }
    .form-group { margin: 15px 0; }
    label { display: block; font-weight: bold; margin-bottom: 5px; }
    input[type="text"], input[type="password"] {
        width: 100%; padding: 10px; border: 1px solid #ddd; border-radius: 4px; box-sizing: border-box;
    }
    button { background: #0066cc; color: white; padding: 10px 20px; border: none; border-radius: 4px; }
    ul.todos { list-style: none; padding: 0; }
    ul.todos li { padding: 8px; border-bottom: 1px solid #eee; }
    .done { text-decoration: line-through; color: #999; }
    .meta { color: #999; font-size: 12px; }
    .nav { text-align: right; }
"#;

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{title}</title>
    <style>{STYLES}</style>
</head>
<body>
    <div class="container">
{body}
    </div>
</body>
</html>"#,
        title = html_escape(title),
    )
}

fn error_block(error: Option<&str>) -> String {
    match error {
        Some(e) => format!(r#"<div class="error">{}</div>"#, html_escape(e)),
        None => String::new(),
    }
}

pub fn login_page(error: Option<&str>, username: &str) -> String {
    let body = format!(
        r#"        <h1>Login</h1>
        {error}
        <form method="post" action="/login">
            <div class="form-group">
                <label for="username">Username</label>
                <input type="text" id="username" name="username" value="{username}" required>
            </div>
            <div class="form-group">
                <label for="password">Password</label>
                <input type="password" id="password" name="password" required>
            </div>
            <button type="submit">Login</button>
        </form>
        <p>No account yet? <a href="/register">Register</a></p>"#,
        error = error_block(error),
        username = html_escape(username),
    );
    layout("Login", &body)
}

pub fn register_page(error: Option<&str>, username: &str) -> String {
    let body = format!(
        r#"        <h1>Register</h1>
        {error}
        <form method="post" action="/register">
            <div class="form-group">
                <label for="username">Username</label>
                <input type="text" id="username" name="username" value="{username}" required>
            </div>
            <div class="form-group">
                <label for="password">Password</label>
                <input type="password" id="password" name="password" required>
            </div>
            <div class="form-group">
                <label for="confirm_password">Confirm password</label>
                <input type="password" id="confirm_password" name="confirm_password" required>
            </div>
            <button type="submit">Register</button>
        </form>
        <p>Already registered? <a href="/login">Login</a></p>"#,
        error = error_block(error),
        username = html_escape(username),
    );
    layout("Register", &body)
}

pub fn index_page(user: &CurrentUser, todos: &[TodoItem]) -> String {
    let items = if todos.is_empty() {
        "            <li>Nothing to do yet.</li>".to_string()
    } else {
        todos
            .iter()
            .map(todo_row)
            .collect::<Vec<_>>()
            .join("\n")
    };

    let body = format!(
        r#"        <div class="nav">{username} | <a href="/logout">Logout</a></div>
        <h1>My Todos</h1>
        <form method="post" action="/add">
            <div class="form-group">
                <input type="text" name="todo" placeholder="What needs doing?" autofocus>
            </div>
            <button type="submit">Add</button>
        </form>
        <ul class="todos">
{items}
        </ul>"#,
        username = html_escape(&user.username),
    );
    layout("My Todos", &body)
}

fn todo_row(todo: &TodoItem) -> String {
    let created = todo.created_at.format("%Y-%m-%d %H:%M:%S");
    if todo.completed {
        format!(
            r#"            <li><span class="done">{text}</span> <span class="meta">{created}</span> <a href="/delete/{id}">Delete</a></li>"#,
            text = html_escape(&todo.text),
            id = todo.id,
        )
    } else {
        format!(
            r#"            <li>{text} <span class="meta">{created}</span> <a href="/complete/{id}">Complete</a> <a href="/delete/{id}">Delete</a></li>"#,
            text = html_escape(&todo.text),
            id = todo.id,
        )
    }
}

fn html_escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
