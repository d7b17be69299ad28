use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::{ListChanges, Todo, TodoChanges, TodoList, User};
use crate::filter::Filter;

/// Errors that can occur during repository operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                RepositoryError::Unavailable(err.to_string())
            }
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                RepositoryError::Conflict(db.message().to_string())
            }
            sqlx::Error::RowNotFound => RepositoryError::NotFound("Record not found".to_string()),
            _ => RepositoryError::Database(err.to_string()),
        }
    }
}

/// Todo documents. `owner` adds a `user_id` condition when present.
#[async_trait]
pub trait TodoRepository: Send + Sync {
    async fn insert_todo(&self, todo: Todo) -> Result<Todo, RepositoryError>;

    async fn find_todos(&self, filter: &Filter) -> Result<Vec<Todo>, RepositoryError>;

    async fn find_todo(&self, id: Uuid, owner: Option<Uuid>) -> Result<Option<Todo>, RepositoryError>;

    /// Atomic find-and-modify; `None` when nothing matched.
    async fn update_todo(
        &self,
        id: Uuid,
        owner: Option<Uuid>,
        changes: TodoChanges,
    ) -> Result<Option<Todo>, RepositoryError>;

    /// Atomic find-and-delete; returns the removed document.
    async fn delete_todo(&self, id: Uuid, owner: Option<Uuid>) -> Result<Option<Todo>, RepositoryError>;
}

/// List documents, always scoped by owner.
#[async_trait]
pub trait ListRepository: Send + Sync {
    async fn insert_list(&self, list: TodoList) -> Result<TodoList, RepositoryError>;

    async fn find_lists(&self, filter: &Filter) -> Result<Vec<TodoList>, RepositoryError>;

    async fn find_list(&self, id: Uuid, owner: Uuid) -> Result<Option<TodoList>, RepositoryError>;

    async fn update_list(
        &self,
        id: Uuid,
        owner: Uuid,
        changes: ListChanges,
    ) -> Result<Option<TodoList>, RepositoryError>;

    async fn delete_list(&self, id: Uuid, owner: Uuid) -> Result<Option<TodoList>, RepositoryError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `Conflict` when the username or email is taken.
    async fn insert_user(&self, user: User) -> Result<User, RepositoryError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError>;

    /// Appends to the stored refresh tokens and returns the updated user.
    async fn push_refresh_token(&self, id: Uuid, token: String) -> Result<Option<User>, RepositoryError>;

    async fn delete_user(&self, username: &str) -> Result<Option<User>, RepositoryError>;
}

#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn ping(&self) -> Result<(), RepositoryError>;
}
