//! Registration, login and session lifecycle.

mod password;
mod session;

pub use password::{verify_password, PasswordHasher};
pub use session::{generate_secret, Session, SessionStore, SessionToken};

use crate::{
    error::{AuthError, StoreError, ValidationError},
    model::{CurrentUser, User, UserId},
    store::Store,
};

const MIN_USERNAME_LEN: usize = 3;
const MIN_PASSWORD_LEN: usize = 6;

#[derive(Clone)]
pub struct AuthService {
    store: Store,
    hasher: PasswordHasher,
    sessions: SessionStore,
}

impl AuthService {
    pub fn new(store: Store, hasher: PasswordHasher, sessions: SessionStore) -> Self {
        Self {
            store,
            hasher,
            sessions,
        }
    }

    /// Create an account. Surrounding whitespace is stripped from the
    /// username before any check.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<UserId, AuthError> {
        let username = username.trim();
        let result = self.try_register(username, password, confirm_password).await;

        match &result {
            Ok(user_id) => tracing::info!(%username, %user_id, "Registration succeeded"),
            Err(err) => tracing::warn!(%username, reason = %err, "Registration failed"),
        }
        result
    }

    async fn try_register(
        &self,
        username: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<UserId, AuthError> {
        validate_registration(username, password, confirm_password)?;

        let user = User::new(username, self.hasher.hash(password)?);
        let user_id = user.id.clone();

        match self.store.insert_user(user).await {
            Ok(()) => Ok(user_id),
            Err(StoreError::UsernameTaken(_)) => Err(ValidationError::UsernameTaken.into()),
            Err(e) => Err(e.into()),
        }
    }

    /// Check credentials and open a session. Returns the signed cookie value.
    /// The username is trimmed the same way as at registration.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let username = username.trim();
        let result = self.try_login(username, password).await;

        match &result {
            Ok(_) => tracing::info!(%username, "Login succeeded"),
            Err(err) => tracing::warn!(%username, reason = %err, "Login failed"),
        }
        result
    }

    async fn try_login(&self, username: &str, password: &str) -> Result<String, AuthError> {
        let user = self
            .store
            .find_user_by_username(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        self.sessions.create_session(CurrentUser::from(&user)).await
    }

    pub async fn logout(&self, cookie_value: &str) {
        if self.sessions.destroy_session(cookie_value).await {
            tracing::debug!("Session destroyed");
        }
    }

    pub async fn resolve(&self, cookie_value: &str) -> Option<CurrentUser> {
        self.sessions.resolve(cookie_value).await
    }

    pub async fn user_count(&self) -> Result<usize, StoreError> {
        self.store.user_count().await
    }
}

fn validate_registration(
    username: &str,
    password: &str,
    confirm_password: &str,
) -> Result<(), ValidationError> {
    if username.is_empty() || password.is_empty() || confirm_password.is_empty() {
        return Err(ValidationError::MissingFields);
    }
    if username.chars().count() < MIN_USERNAME_LEN {
        return Err(ValidationError::UsernameTooShort);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    if password != confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}
