// handlers/public/auth/register.rs - POST /users handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::hash_password_blocking;
use crate::database::models::User;
use crate::database::RepositoryError;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::validation::{self, Validations};

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /users - Create an account
///
/// Username and email are unique; a duplicate of either is a 409.
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(payload) = payload?;

    Validations::new()
        .with("username", validation::username(payload.username.as_deref()))
        .with("email", validation::email(payload.email.as_deref()))
        .with("password", validation::password(payload.password.as_deref()))
        .into_result()?;

    let (Some(username), Some(email), Some(password)) = (payload.username, payload.email, payload.password) else {
        return Err(ApiError::bad_request("Username, email and password are required"));
    };

    let password_hash = hash_password_blocking(password, state.config.security.password_hash_cost).await?;
    let user = User::new(username, email.to_lowercase(), password_hash);

    let user = state.users.insert_user(user).await.map_err(|e| match e {
        RepositoryError::Conflict(_) => ApiError::conflict("Username or email is already taken"),
        other => ApiError::from(other),
    })?;
    tracing::info!(user = %user.username, "Account created");

    Ok(ApiResponse::created(json!({
        "user": user,
        "message": "User created successfully!"
    })))
}
