use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failure while reading or writing a store record.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed store data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Username {0:?} is already taken")]
    UsernameTaken(String),
}

/// Registration form problems. The `Display` text is shown to the user as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("All fields are required")]
    MissingFields,

    #[error("Username must be at least 3 characters")]
    UsernameTooShort,

    #[error("Password must be at least 6 characters")]
    PasswordTooShort,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Username already exists")]
    UsernameTaken,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    // Unknown user and wrong password share this variant.
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Secure random generator failed")]
    Random,

    #[error("Session lifetime is out of range")]
    SessionLifetime,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Error returned from request handlers.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::Store(e) => {
                tracing::error!("Store error: {}", e);
                "Something bad happened while accessing the store"
            }
            AppError::Auth(e) => {
                tracing::error!("Auth error: {}", e);
                "Something bad happened while authenticating"
            }
        };

        let error_response = json!({
            "status": "error",
            "message": message,
        });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(error_response)).into_response()
    }
}
