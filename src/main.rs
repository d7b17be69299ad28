use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use todo_api_rust::config::{self, StorageBackend};
use todo_api_rust::database::{DatabaseManager, MemoryStore, PostgresStore};
use todo_api_rust::state::AppState;

#[derive(Parser)]
#[command(name = "todo-api-rust")]
#[command(about = "Todo and list management REST API")]
#[command(version)]
struct Args {
    #[arg(long, env = "HOST", default_value = "0.0.0.0", help = "Interface to bind")]
    host: String,

    #[arg(long, env = "TODO_API_PORT", help = "Port to listen on (falls back to PORT, then 3000)")]
    port: Option<u16>,

    #[arg(long, help = "Keep all data in process memory instead of Postgres")]
    memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("todo_api_rust=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = config::config().clone();
    if args.memory {
        config.database.backend = StorageBackend::Memory;
    }
    tracing::info!("Starting Todo API in {:?} mode", config.environment);
    if config.security.jwt_secret.is_empty() {
        tracing::warn!("JWT_SECRET is not set; sign-in will fail until it is configured");
    }

    let state = match config.database.backend {
        StorageBackend::Memory => {
            tracing::info!("Using in-memory store; data is lost on exit");
            AppState::new(Arc::new(MemoryStore::new()), config)
        }
        StorageBackend::Postgres => {
            let pool = DatabaseManager::connect(&config.database)
                .await
                .context("failed to connect to Postgres")?;
            DatabaseManager::ensure_schema(&pool)
                .await
                .context("failed to create schema")?;
            AppState::new(Arc::new(PostgresStore::new(pool)), config)
        }
    };

    let port = args
        .port
        .or_else(|| std::env::var("PORT").ok().and_then(|s| s.parse().ok()))
        .unwrap_or(3000);
    let addr: SocketAddr = format!("{}:{}", args.host, port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", args.host, port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("Todo API listening on http://{}", addr);

    axum::serve(listener, todo_api_rust::app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
