//! Multi-user to-do list web application.
//!
//! Users register, log in, and keep a private list of todos. Lists are stored
//! per user, either as JSON files or in SQLite, and every todo route requires
//! a live session.

pub mod auth;
pub mod config;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod model;
pub mod route;
pub mod schema;
pub mod store;
pub mod todo;
pub mod views;

use auth::{AuthService, PasswordHasher, SessionStore};
use config::Config;
use error::AppError;
use store::Store;
use todo::TodoService;

pub use route::create_router;

// Struct representing the application state
pub struct AppState {
    pub auth: AuthService,
    pub todos: TodoService,
    pub store: Store,
}

impl AppState {
    pub fn new(store: Store, hasher: PasswordHasher, sessions: SessionStore) -> Self {
        Self {
            auth: AuthService::new(store.clone(), hasher, sessions),
            todos: TodoService::new(store.clone()),
            store,
        }
    }

    /// Open the configured store and set up sessions. Without a configured
    /// secret, a random one is drawn, so cookies from an earlier run stop
    /// working.
    pub async fn from_config(config: &Config) -> Result<Self, AppError> {
        let store = Store::open(config).await?;

        let secret = match &config.session_secret {
            Some(secret) => secret.clone().into_bytes(),
            None => {
                tracing::warn!(
                    "No session secret configured; generated one for this run, sessions will not survive a restart"
                );
                auth::generate_secret()?
            }
        };

        let sessions = SessionStore::new(&secret, config.session_ttl());
        let hasher = PasswordHasher::new(config.password_iterations);
        Ok(Self::new(store, hasher, sessions))
    }
}
