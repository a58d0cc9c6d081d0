use std::sync::Arc;

use sqlx::{
    migrate::MigrateDatabase, query, query_as, query_scalar, sqlite::SqlitePoolOptions, Pool,
    Sqlite,
};
use tokio::sync::Mutex;

use super::Result;
use crate::{
    error::StoreError,
    model::{TodoItem, User},
};

const CREATE_USERS_TABLE: &str = r#"CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY NOT NULL,
    username TEXT NOT NULL,
    username_key TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at TEXT NOT NULL
);"#;

// One row per user; `items` holds the whole list as a JSON array.
const CREATE_TODO_LISTS_TABLE: &str = r#"CREATE TABLE IF NOT EXISTS todo_lists (
    user_id TEXT PRIMARY KEY NOT NULL,
    items TEXT NOT NULL
);"#;

#[derive(Debug, Clone)]
pub struct SqliteStore {
    db: Pool<Sqlite>,
    write_lock: Arc<Mutex<()>>,
}

impl SqliteStore {
    /// Connect to `url`, creating the database file and tables if needed.
    pub async fn connect(url: &str) -> Result<Self> {
        let in_memory = url.contains(":memory:");

        if !in_memory && !Sqlite::database_exists(url).await.unwrap_or(false) {
            tracing::info!("Creating database {}", url);
            Sqlite::create_database(url).await?;
        }

        // Each connection to an in-memory database sees its own copy, so keep
        // exactly one alive for the lifetime of the pool.
        let options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(10)
        };
        let db = options.connect(url).await?;

        query(CREATE_USERS_TABLE).execute(&db).await?;
        query(CREATE_TODO_LISTS_TABLE).execute(&db).await?;
        tracing::info!("SQLite store ready at {}", url);

        Ok(Self {
            db,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = query_as::<_, User>(
            "SELECT id, username, password_hash, created_at FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    pub async fn user_count(&self) -> Result<usize> {
        let count = query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.db)
            .await?;
        Ok(count as usize)
    }

    pub async fn insert_user(&self, user: User) -> Result<()> {
        let result = query(
            "INSERT INTO users (id, username, username_key, password_hash, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(user.username_key())
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.db)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(StoreError::UsernameTaken(user.username))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn load_todos(&self, user_id: &str) -> Result<Vec<TodoItem>> {
        let items = query_scalar::<_, String>("SELECT items FROM todo_lists WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?;
        decode_items(items)
    }

    pub async fn update_todos<F, T>(&self, user_id: &str, f: F) -> Result<T>
    where
        F: FnOnce(&mut Vec<TodoItem>) -> T,
    {
        let _guard = self.write_lock.lock().await;
        let mut tx = self.db.begin().await?;

        let items = query_scalar::<_, String>("SELECT items FROM todo_lists WHERE user_id = ?")
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;
        let mut todos = decode_items(items)?;

        let output = f(&mut todos);

        query(
            "INSERT INTO todo_lists (user_id, items) VALUES (?, ?) \
             ON CONFLICT(user_id) DO UPDATE SET items = excluded.items",
        )
        .bind(user_id)
        .bind(serde_json::to_string(&todos)?)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(output)
    }
}

fn decode_items(items: Option<String>) -> Result<Vec<TodoItem>> {
    match items {
        Some(items) => Ok(serde_json::from_str(&items)?),
        None => Ok(Vec::new()),
    }
}
