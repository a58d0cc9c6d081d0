use std::{
    collections::BTreeMap,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::{de::DeserializeOwned, Serialize};
use tokio::{fs, sync::Mutex};

use super::Result;
use crate::{
    error::StoreError,
    model::{TodoItem, User},
};

const USERS_FILE: &str = "users.json";
const TODOS_DIR: &str = "todos";

type UserTable = BTreeMap<String, User>;

/// Flat-file store: `users.json` maps user id to user record, and each user's
/// list lives in `todos/user_<id>.json`.
#[derive(Debug, Clone)]
pub struct JsonStore {
    root: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl JsonStore {
    pub async fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(root.join(TODOS_DIR)).await?;
        tracing::info!("JSON store ready at {}", root.display());

        Ok(Self {
            root,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn users_path(&self) -> PathBuf {
        self.root.join(USERS_FILE)
    }

    pub fn todos_path(&self, user_id: &str) -> PathBuf {
        self.root.join(TODOS_DIR).join(format!("user_{user_id}.json"))
    }

    async fn load_users(&self) -> Result<UserTable> {
        read_or_default(&self.users_path()).await
    }

    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let users = self.load_users().await?;
        Ok(users.into_values().find(|u| u.username == username))
    }

    pub async fn user_count(&self) -> Result<usize> {
        Ok(self.load_users().await?.len())
    }

    pub async fn insert_user(&self, user: User) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let path = self.users_path();
        let mut users: UserTable = read_or_default(&path).await?;
        let key = user.username_key();
        if users.values().any(|u| u.username_key() == key) {
            return Err(StoreError::UsernameTaken(user.username));
        }

        users.insert(user.id.clone(), user);
        write_atomic(&path, &users).await
    }

    pub async fn load_todos(&self, user_id: &str) -> Result<Vec<TodoItem>> {
        read_or_default(&self.todos_path(user_id)).await
    }

    pub async fn update_todos<F, T>(&self, user_id: &str, f: F) -> Result<T>
    where
        F: FnOnce(&mut Vec<TodoItem>) -> T,
    {
        let _guard = self.write_lock.lock().await;

        let path = self.todos_path(user_id);
        let mut todos: Vec<TodoItem> = read_or_default(&path).await?;
        let output = f(&mut todos);
        write_atomic(&path, &todos).await?;
        Ok(output)
    }
}

/// A missing file reads as the empty value.
async fn read_or_default<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    match fs::read(path).await {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(T::default()),
        Err(e) => Err(e.into()),
    }
}

async fn write_atomic<T>(path: &Path, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
{
    let bytes = serde_json::to_vec_pretty(value)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, bytes).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}
