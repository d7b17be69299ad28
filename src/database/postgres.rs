//! Postgres-backed repositories.
//!
//! Each entity lives in its own table (see [`DatabaseManager::ensure_schema`]).
//! Single-document mutations are one `UPDATE ... RETURNING` or
//! `DELETE ... RETURNING` statement, so Postgres provides the find-and-modify
//! atomicity.
//!
//! [`DatabaseManager::ensure_schema`]: crate::database::DatabaseManager::ensure_schema

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::database::models::{ListChanges, Priority, Todo, TodoChanges, TodoList, User};
use crate::database::query_builder::{delete_sql, update_list_sql, update_todo_sql};
use crate::database::repository::{
    HealthCheck, ListRepository, RepositoryError, TodoRepository, UserRepository,
};
use crate::database::DatabaseManager;
use crate::filter::filter_order::select_sql;
use crate::filter::{Column, Filter};

#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Row shape of `todos`; priority is stored as text.
#[derive(Debug, FromRow)]
struct TodoRow {
    id: Uuid,
    user_id: Uuid,
    list_id: Option<Uuid>,
    name: String,
    notes: Option<String>,
    url: Option<String>,
    due: DateTime<Utc>,
    priority: String,
    completed: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TodoRow> for Todo {
    type Error = RepositoryError;

    fn try_from(row: TodoRow) -> Result<Self, Self::Error> {
        let priority = Priority::parse(&row.priority).ok_or_else(|| {
            RepositoryError::Corrupt(format!("todo {} has unknown priority '{}'", row.id, row.priority))
        })?;
        Ok(Todo {
            id: row.id,
            user_id: row.user_id,
            list_id: row.list_id,
            name: row.name,
            notes: row.notes,
            url: row.url,
            due: row.due,
            priority,
            completed: row.completed,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn by_id(id: Uuid, owner: Option<Uuid>) -> Filter {
    let filter = Filter::new().eq(Column::Id, id);
    match owner {
        Some(owner) => filter.eq(Column::UserId, owner),
        None => filter,
    }
}

#[async_trait]
impl TodoRepository for PostgresStore {
    async fn insert_todo(&self, todo: Todo) -> Result<Todo, RepositoryError> {
        let row: TodoRow = sqlx::query_as(
            "INSERT INTO todos (id, user_id, list_id, name, notes, url, due, priority, completed, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING *",
        )
        .bind(todo.id)
        .bind(todo.user_id)
        .bind(todo.list_id)
        .bind(&todo.name)
        .bind(&todo.notes)
        .bind(&todo.url)
        .bind(todo.due)
        .bind(todo.priority.as_str())
        .bind(todo.completed)
        .bind(todo.created_at)
        .bind(todo.updated_at)
        .fetch_one(&self.pool)
        .await?;
        row.try_into()
    }

    async fn find_todos(&self, filter: &Filter) -> Result<Vec<Todo>, RepositoryError> {
        let mut builder = select_sql("todos", filter);
        let rows = builder.build_query_as::<TodoRow>().fetch_all(&self.pool).await?;
        rows.into_iter().map(Todo::try_from).collect()
    }

    async fn find_todo(&self, id: Uuid, owner: Option<Uuid>) -> Result<Option<Todo>, RepositoryError> {
        let mut builder = select_sql("todos", &by_id(id, owner));
        let row = builder.build_query_as::<TodoRow>().fetch_optional(&self.pool).await?;
        row.map(Todo::try_from).transpose()
    }

    async fn update_todo(
        &self,
        id: Uuid,
        owner: Option<Uuid>,
        changes: TodoChanges,
    ) -> Result<Option<Todo>, RepositoryError> {
        let mut builder = update_todo_sql(id, owner, changes, Utc::now());
        let row = builder.build_query_as::<TodoRow>().fetch_optional(&self.pool).await?;
        row.map(Todo::try_from).transpose()
    }

    async fn delete_todo(&self, id: Uuid, owner: Option<Uuid>) -> Result<Option<Todo>, RepositoryError> {
        let mut builder = delete_sql("todos", id, owner);
        let row = builder.build_query_as::<TodoRow>().fetch_optional(&self.pool).await?;
        row.map(Todo::try_from).transpose()
    }
}

#[async_trait]
impl ListRepository for PostgresStore {
    async fn insert_list(&self, list: TodoList) -> Result<TodoList, RepositoryError> {
        let list = sqlx::query_as::<_, TodoList>(
            "INSERT INTO lists (id, user_id, name, color, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(list.id)
        .bind(list.user_id)
        .bind(&list.name)
        .bind(&list.color)
        .bind(list.created_at)
        .bind(list.updated_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(list)
    }

    async fn find_lists(&self, filter: &Filter) -> Result<Vec<TodoList>, RepositoryError> {
        let mut builder = select_sql("lists", filter);
        Ok(builder.build_query_as::<TodoList>().fetch_all(&self.pool).await?)
    }

    async fn find_list(&self, id: Uuid, owner: Uuid) -> Result<Option<TodoList>, RepositoryError> {
        let mut builder = select_sql("lists", &by_id(id, Some(owner)));
        Ok(builder.build_query_as::<TodoList>().fetch_optional(&self.pool).await?)
    }

    async fn update_list(
        &self,
        id: Uuid,
        owner: Uuid,
        changes: ListChanges,
    ) -> Result<Option<TodoList>, RepositoryError> {
        let mut builder = update_list_sql(id, owner, changes, Utc::now());
        Ok(builder.build_query_as::<TodoList>().fetch_optional(&self.pool).await?)
    }

    async fn delete_list(&self, id: Uuid, owner: Uuid) -> Result<Option<TodoList>, RepositoryError> {
        let mut builder = delete_sql("lists", id, Some(owner));
        Ok(builder.build_query_as::<TodoList>().fetch_optional(&self.pool).await?)
    }
}

#[async_trait]
impl UserRepository for PostgresStore {
    async fn insert_user(&self, user: User) -> Result<User, RepositoryError> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (id, username, email, password_hash, refresh_tokens, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.refresh_tokens)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match RepositoryError::from(e) {
            RepositoryError::Conflict(_) => RepositoryError::Conflict("Username or email is already in use".to_string()),
            other => other,
        })
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        Ok(sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        Ok(sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn push_refresh_token(&self, id: Uuid, token: String) -> Result<Option<User>, RepositoryError> {
        Ok(sqlx::query_as::<_, User>(
            "UPDATE users SET refresh_tokens = array_append(refresh_tokens, $1), updated_at = $2 \
             WHERE id = $3 RETURNING *",
        )
        .bind(token)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn delete_user(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        Ok(sqlx::query_as::<_, User>("DELETE FROM users WHERE username = $1 RETURNING *")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?)
    }
}

#[async_trait]
impl HealthCheck for PostgresStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        DatabaseManager::health_check(&self.pool).await.map_err(|e| match e {
            crate::database::DatabaseError::Sqlx(err) => RepositoryError::from(err),
            other => RepositoryError::Unavailable(other.to_string()),
        })
    }
}
