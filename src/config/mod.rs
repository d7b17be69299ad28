use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Path prefix every resource route is nested under, e.g. `/api/v1`.
    pub prefix: String,
    /// Fixed page size for GET /lists. Not exposed to callers.
    pub list_page_limit: i64,
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
}

impl ApiConfig {
    /// Mount point for the resource routes: `prefix` with exactly one leading
    /// slash and no trailing slash, or `None` to mount at the root.
    pub fn route_prefix(&self) -> Option<String> {
        normalize_prefix(&self.prefix)
    }
}

fn normalize_prefix(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_matches('/');
    (!trimmed.is_empty()).then(|| format!("/{}", trimmed))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub backend: StorageBackend,
    pub url: Option<String>,
    /// Replaces the database name in `url` when set.
    pub name: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub access_token_expiry_minutes: i64,
    pub refresh_token_expiry_days: i64,
    /// bcrypt work factor for stored passwords.
    pub password_hash_cost: u32,
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
    /// Adds the caller's id to todo lookups by ID. Lists are always scoped.
    pub enforce_todo_ownership: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // API overrides
        if let Ok(v) = env::var("API_PREFIX") {
            self.api.prefix = normalize_prefix(&v).unwrap_or_default();
        }
        if let Ok(v) = env::var("API_LIST_PAGE_LIMIT") {
            self.api.list_page_limit = v.parse().unwrap_or(self.api.list_page_limit);
        }
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }

        // Database overrides
        if let Ok(v) = env::var("STORAGE_BACKEND") {
            self.database.backend = match v.to_ascii_lowercase().as_str() {
                "memory" => StorageBackend::Memory,
                "postgres" => StorageBackend::Postgres,
                _ => self.database.backend,
            };
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v);
        }
        if let Ok(v) = env::var("DATABASE_NAME") {
            self.database.name = Some(v);
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("ACCESS_TOKEN_EXPIRY_MINUTES") {
            self.security.access_token_expiry_minutes =
                v.parse().unwrap_or(self.security.access_token_expiry_minutes);
        }
        if let Ok(v) = env::var("REFRESH_TOKEN_EXPIRY_DAYS") {
            self.security.refresh_token_expiry_days =
                v.parse().unwrap_or(self.security.refresh_token_expiry_days);
        }
        if let Ok(v) = env::var("PASSWORD_HASH_COST") {
            self.security.password_hash_cost = v.parse().unwrap_or(self.security.password_hash_cost);
        }
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Ok(v) = env::var("SECURITY_ENFORCE_TODO_OWNERSHIP") {
            self.security.enforce_todo_ownership =
                v.parse().unwrap_or(self.security.enforce_todo_ownership);
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                prefix: "/api/v1".to_string(),
                list_page_limit: 100,
                enable_request_logging: true,
                max_request_size_bytes: 1024 * 1024, // 1MB
            },
            database: DatabaseConfig {
                backend: StorageBackend::Postgres,
                url: None,
                name: None,
                max_connections: 10,
                connection_timeout: 30,
            },
            security: SecurityConfig {
                jwt_secret: "development-secret-change-me".to_string(),
                access_token_expiry_minutes: 15,
                refresh_token_expiry_days: 30,
                password_hash_cost: bcrypt::DEFAULT_COST,
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
                enforce_todo_ownership: false,
            },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            api: ApiConfig {
                prefix: "/api/v1".to_string(),
                list_page_limit: 100,
                enable_request_logging: true,
                max_request_size_bytes: 512 * 1024,
            },
            database: DatabaseConfig {
                backend: StorageBackend::Postgres,
                url: None,
                name: None,
                max_connections: 20,
                connection_timeout: 10,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                access_token_expiry_minutes: 15,
                refresh_token_expiry_days: 30,
                password_hash_cost: bcrypt::DEFAULT_COST,
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
                enforce_todo_ownership: false,
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                prefix: "/api/v1".to_string(),
                list_page_limit: 100,
                enable_request_logging: false,
                max_request_size_bytes: 256 * 1024,
            },
            database: DatabaseConfig {
                backend: StorageBackend::Postgres,
                url: None,
                name: None,
                max_connections: 50,
                connection_timeout: 5,
            },
            security: SecurityConfig {
                // Must come from JWT_SECRET; token signing refuses an empty secret
                jwt_secret: String::new(),
                access_token_expiry_minutes: 15,
                refresh_token_expiry_days: 30,
                password_hash_cost: bcrypt::DEFAULT_COST,
                enable_cors: true,
                cors_origins: vec!["https://app.example.com".to_string()],
                enforce_todo_ownership: false,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.api.prefix, "/api/v1");
        assert_eq!(config.api.list_page_limit, 100);
        assert!(!config.security.jwt_secret.is_empty());
        assert!(!config.security.enforce_todo_ownership);
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert_eq!(config.environment, Environment::Production);
        assert!(config.security.jwt_secret.is_empty());
        assert_eq!(config.database.backend, StorageBackend::Postgres);
    }

    #[test]
    fn token_lifetimes_match_across_presets() {
        for config in [AppConfig::development(), AppConfig::staging(), AppConfig::production()] {
            assert_eq!(config.security.access_token_expiry_minutes, 15);
            assert_eq!(config.security.refresh_token_expiry_days, 30);
            assert_eq!(config.security.password_hash_cost, bcrypt::DEFAULT_COST);
        }
    }

    #[test]
    fn route_prefix_is_normalized() {
        let mut api = AppConfig::development().api;
        assert_eq!(api.route_prefix().as_deref(), Some("/api/v1"));

        api.prefix = "api/v1".to_string();
        assert_eq!(api.route_prefix().as_deref(), Some("/api/v1"));

        api.prefix = " /api/v2/ ".to_string();
        assert_eq!(api.route_prefix().as_deref(), Some("/api/v2"));

        for root in ["", "/", "//"] {
            api.prefix = root.to_string();
            assert_eq!(api.route_prefix(), None);
        }
    }
}
