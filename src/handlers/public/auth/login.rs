// handlers/public/auth/login.rs - POST /users/signin handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{issue_tokens, verify_password_blocking};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::validation::{self, Validations};

const BAD_CREDENTIALS: &str = "Invalid username or password";

#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// POST /users/signin - Verify credentials and issue tokens
///
/// Unknown users and wrong passwords get the same 401. The new refresh
/// token is appended to the account before the response is sent.
pub async fn signin(
    State(state): State<AppState>,
    payload: Result<Json<SigninRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(payload) = payload?;

    Validations::new()
        .with("username", validation::required(payload.username.as_deref(), "Username"))
        .with("password", validation::required(payload.password.as_deref(), "Password"))
        .into_result()?;

    let username = payload.username.unwrap_or_default();
    let password = payload.password.unwrap_or_default();

    let user = match state.users.find_user_by_username(&username).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::debug!(user = %username, "Sign-in for unknown user");
            return Err(ApiError::unauthorized(BAD_CREDENTIALS));
        }
        Err(e) => {
            tracing::warn!(user = %username, "User lookup failed during sign-in: {}", e);
            return Err(ApiError::unauthorized(BAD_CREDENTIALS));
        }
    };

    if !verify_password_blocking(password, user.password_hash.clone()).await? {
        tracing::debug!(user = %username, "Sign-in with wrong password");
        return Err(ApiError::unauthorized(BAD_CREDENTIALS));
    }

    let tokens = issue_tokens(&user, &state.config.security)?;
    let user = state
        .users
        .push_refresh_token(user.id, tokens.refresh_token.clone())
        .await?
        .ok_or_else(|| ApiError::unauthorized(BAD_CREDENTIALS))?;
    tracing::info!(user = %user.username, "Signed in");

    Ok(ApiResponse::success(json!({
        "user": user,
        "message": "Signed in successfully!",
        "tokens": tokens
    })))
}
