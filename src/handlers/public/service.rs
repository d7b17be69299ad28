// handlers/public/service.rs - GET / and GET /health

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::state::AppState;

pub async fn root(State(state): State<AppState>) -> Json<Value> {
    let prefix = state.config.api.route_prefix().unwrap_or_default();

    Json(json!({
        "name": "Todo API (Rust)",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Todo and list management REST API",
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "users": format!("{}/users[/signin|/token|/me|/:username]", prefix),
            "todos": format!("{}/todos[/:id|/complete/:id|/uncomplete/:id|/priority/:id|/list/:id] (protected)", prefix),
            "lists": format!("{}/lists[/:id] (protected)", prefix),
        }
    }))
}

/// Pings the store; 503 when it is unreachable.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.health.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable"
                })),
            )
        }
    }
}
