use std::sync::Arc;

use uuid::Uuid;

use crate::config::AppConfig;
use crate::database::{HealthCheck, ListRepository, TodoRepository, UserRepository};
use crate::middleware::AuthUser;

/// Shared handler state: repositories and configuration.
#[derive(Clone)]
pub struct AppState {
    pub todos: Arc<dyn TodoRepository>,
    pub lists: Arc<dyn ListRepository>,
    pub users: Arc<dyn UserRepository>,
    pub health: Arc<dyn HealthCheck>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Wires every repository to the same backing store.
    pub fn new<S>(store: Arc<S>, config: AppConfig) -> Self
    where
        S: TodoRepository + ListRepository + UserRepository + HealthCheck + 'static,
    {
        Self {
            todos: store.clone(),
            lists: store.clone(),
            users: store.clone(),
            health: store,
            config: Arc::new(config),
        }
    }

    /// Owner condition for todo lookups by ID; `None` unless
    /// `enforce_todo_ownership` is on.
    pub fn todo_owner(&self, user: &AuthUser) -> Option<Uuid> {
        self.config.security.enforce_todo_ownership.then_some(user.id)
    }
}
