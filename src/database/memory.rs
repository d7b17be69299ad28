//! In-memory repositories.
//!
//! Backs the integration tests and `--memory` development runs. Each map sits
//! behind a `tokio::sync::RwLock`; find-and-modify holds the write lock for
//! the whole lookup and mutation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::models::{ListChanges, Todo, TodoChanges, TodoList, User};
use crate::database::repository::{
    HealthCheck, ListRepository, RepositoryError, TodoRepository, UserRepository,
};
use crate::filter::Filter;

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    todos: Arc<RwLock<HashMap<Uuid, Todo>>>,
    lists: Arc<RwLock<HashMap<Uuid, TodoList>>>,
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn owned_by(user_id: Uuid, owner: Option<Uuid>) -> bool {
    owner.map_or(true, |owner| owner == user_id)
}

#[async_trait]
impl TodoRepository for MemoryStore {
    async fn insert_todo(&self, todo: Todo) -> Result<Todo, RepositoryError> {
        let mut todos = self.todos.write().await;
        if todos.contains_key(&todo.id) {
            return Err(RepositoryError::Conflict(format!("todo {} already exists", todo.id)));
        }
        todos.insert(todo.id, todo.clone());
        Ok(todo)
    }

    async fn find_todos(&self, filter: &Filter) -> Result<Vec<Todo>, RepositoryError> {
        Ok(filter.apply(self.todos.read().await.values()))
    }

    async fn find_todo(&self, id: Uuid, owner: Option<Uuid>) -> Result<Option<Todo>, RepositoryError> {
        let todos = self.todos.read().await;
        Ok(todos.get(&id).filter(|t| owned_by(t.user_id, owner)).cloned())
    }

    async fn update_todo(
        &self,
        id: Uuid,
        owner: Option<Uuid>,
        changes: TodoChanges,
    ) -> Result<Option<Todo>, RepositoryError> {
        let mut todos = self.todos.write().await;
        match todos.get_mut(&id).filter(|t| owned_by(t.user_id, owner)) {
            Some(todo) => {
                changes.apply(todo, Utc::now());
                Ok(Some(todo.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_todo(&self, id: Uuid, owner: Option<Uuid>) -> Result<Option<Todo>, RepositoryError> {
        let mut todos = self.todos.write().await;
        if !todos.get(&id).is_some_and(|t| owned_by(t.user_id, owner)) {
            return Ok(None);
        }
        Ok(todos.remove(&id))
    }
}

#[async_trait]
impl ListRepository for MemoryStore {
    async fn insert_list(&self, list: TodoList) -> Result<TodoList, RepositoryError> {
        let mut lists = self.lists.write().await;
        if lists.contains_key(&list.id) {
            return Err(RepositoryError::Conflict(format!("list {} already exists", list.id)));
        }
        lists.insert(list.id, list.clone());
        Ok(list)
    }

    async fn find_lists(&self, filter: &Filter) -> Result<Vec<TodoList>, RepositoryError> {
        Ok(filter.apply(self.lists.read().await.values()))
    }

    async fn find_list(&self, id: Uuid, owner: Uuid) -> Result<Option<TodoList>, RepositoryError> {
        let lists = self.lists.read().await;
        Ok(lists.get(&id).filter(|l| l.user_id == owner).cloned())
    }

    async fn update_list(
        &self,
        id: Uuid,
        owner: Uuid,
        changes: ListChanges,
    ) -> Result<Option<TodoList>, RepositoryError> {
        let mut lists = self.lists.write().await;
        match lists.get_mut(&id).filter(|l| l.user_id == owner) {
            Some(list) => {
                changes.apply(list, Utc::now());
                Ok(Some(list.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_list(&self, id: Uuid, owner: Uuid) -> Result<Option<TodoList>, RepositoryError> {
        let mut lists = self.lists.write().await;
        if !lists.get(&id).is_some_and(|l| l.user_id == owner) {
            return Ok(None);
        }
        Ok(lists.remove(&id))
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert_user(&self, user: User) -> Result<User, RepositoryError> {
        let mut users = self.users.write().await;
        let taken = users.values().any(|u| {
            u.username == user.username || u.email.eq_ignore_ascii_case(&user.email)
        });
        if taken {
            return Err(RepositoryError::Conflict("Username or email is already in use".to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn push_refresh_token(&self, id: Uuid, token: String) -> Result<Option<User>, RepositoryError> {
        let mut users = self.users.write().await;
        Ok(users.get_mut(&id).map(|user| {
            user.refresh_tokens.push(token);
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn delete_user(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let mut users = self.users.write().await;
        let id = users.values().find(|u| u.username == username).map(|u| u.id);
        Ok(id.and_then(|id| users.remove(&id)))
    }
}

#[async_trait]
impl HealthCheck for MemoryStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
