//! Todo operations, always scoped to one user's list.

use chrono::Utc;

use crate::{error::StoreError, model::TodoItem, store::Store};

#[derive(Debug, Clone)]
pub struct TodoService {
    store: Store,
}

impl TodoService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn list(&self, user_id: &str) -> Result<Vec<TodoItem>, StoreError> {
        self.store.load_todos(user_id).await
    }

    pub async fn get(&self, user_id: &str, id: u64) -> Result<Option<TodoItem>, StoreError> {
        let todos = self.store.load_todos(user_id).await?;
        Ok(todos.into_iter().find(|t| t.id == id))
    }

    /// Append a todo. Blank text adds nothing and returns `None`.
    pub async fn add(&self, user_id: &str, text: &str) -> Result<Option<TodoItem>, StoreError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let item = self
            .store
            .update_todos(user_id, |todos| {
                let item = TodoItem::new(next_id(todos), text);
                todos.push(item.clone());
                item
            })
            .await?;

        tracing::info!(%user_id, todo_id = item.id, "Added new todo");
        Ok(Some(item))
    }

    /// Mark a todo done. Returns false when no item has `id`.
    pub async fn complete(&self, user_id: &str, id: u64) -> Result<bool, StoreError> {
        let found = self
            .store
            .update_todos(user_id, |todos| {
                match todos.iter_mut().find(|t| t.id == id) {
                    Some(todo) => {
                        todo.completed = true;
                        todo.completed_at = Some(Utc::now());
                        true
                    }
                    None => false,
                }
            })
            .await?;

        if found {
            tracing::info!(%user_id, todo_id = id, "Completed todo");
        }
        Ok(found)
    }

    /// Remove a todo. Returns false when no item has `id`.
    pub async fn delete(&self, user_id: &str, id: u64) -> Result<bool, StoreError> {
        let removed = self
            .store
            .update_todos(user_id, |todos| {
                let before = todos.len();
                todos.retain(|t| t.id != id);
                todos.len() != before
            })
            .await?;

        if removed {
            tracing::info!(%user_id, todo_id = id, "Deleted todo");
        }
        Ok(removed)
    }
}

fn next_id(todos: &[TodoItem]) -> u64 {
    todos.iter().map(|t| t.id).max().unwrap_or(0) + 1
}
