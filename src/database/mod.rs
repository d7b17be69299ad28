pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod query_builder;
pub mod repository;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryStore;
pub use postgres::PostgresStore;
pub use repository::{HealthCheck, ListRepository, RepositoryError, TodoRepository, UserRepository};
