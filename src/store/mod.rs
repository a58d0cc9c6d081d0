//! Persistence for users and per-user todo lists.
//!
//! Every todo mutation is a whole-list read-modify-write. Both backends
//! serialize mutations behind one async mutex, so two requests touching the
//! same list cannot drop each other's change.

mod json;
mod sqlite;

pub use json::JsonStore;
pub use sqlite::SqliteStore;

use crate::{
    config::{Config, StoreBackend},
    error::StoreError,
    model::{TodoItem, User},
};

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Clone)]
pub enum Store {
    Json(JsonStore),
    Sqlite(SqliteStore),
}

impl Store {
    /// Open the backend selected in `config`.
    pub async fn open(config: &Config) -> Result<Self> {
        match config.store {
            StoreBackend::Json => Ok(Store::Json(JsonStore::open(&config.data_dir).await?)),
            StoreBackend::Sqlite => Ok(Store::Sqlite(
                SqliteStore::connect(&config.database_url).await?,
            )),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Store::Json(_) => "json",
            Store::Sqlite(_) => "sqlite",
        }
    }

    /// Exact-match lookup.
    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        match self {
            Store::Json(store) => store.find_user_by_username(username).await,
            Store::Sqlite(store) => store.find_user_by_username(username).await,
        }
    }

    pub async fn user_count(&self) -> Result<usize> {
        match self {
            Store::Json(store) => store.user_count().await,
            Store::Sqlite(store) => store.user_count().await,
        }
    }

    /// Insert a new user, rejecting a username that matches an existing one
    /// ignoring case.
    pub async fn insert_user(&self, user: User) -> Result<()> {
        match self {
            Store::Json(store) => store.insert_user(user).await,
            Store::Sqlite(store) => store.insert_user(user).await,
        }
    }

    pub async fn load_todos(&self, user_id: &str) -> Result<Vec<TodoItem>> {
        match self {
            Store::Json(store) => store.load_todos(user_id).await,
            Store::Sqlite(store) => store.load_todos(user_id).await,
        }
    }

    /// Load the user's list, let `f` mutate it, then write the whole list back.
    pub async fn update_todos<F, T>(&self, user_id: &str, f: F) -> Result<T>
    where
        F: FnOnce(&mut Vec<TodoItem>) -> T,
    {
        match self {
            Store::Json(store) => store.update_todos(user_id, f).await,
            Store::Sqlite(store) => store.update_todos(user_id, f).await,
        }
    }
}
