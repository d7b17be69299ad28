// handlers/protected/users.rs - GET /users/me and DELETE /users/:username

use axum::extract::{Path, State};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// GET /users/me - Profile of the token holder
pub async fn whoami(State(state): State<AppState>, user: AuthUser) -> ApiResult<Value> {
    let account = state
        .users
        .find_user_by_id(user.id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Account no longer exists"))?;

    Ok(ApiResponse::success(json!({ "user": account })))
}

/// DELETE /users/:username - Accounts can only delete themselves
pub async fn delete_account(
    State(state): State<AppState>,
    user: AuthUser,
    Path(username): Path<String>,
) -> ApiResult<Value> {
    if username != user.username {
        tracing::warn!(caller = %user.username, target = %username, "Refused cross-account delete");
        return Err(ApiError::forbidden("You can only delete your own account"));
    }

    state
        .users
        .delete_user(&username)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("No user named {} found!", username)))?;
    tracing::info!(user = %username, "Account deleted");

    Ok(ApiResponse::success(json!({
        "message": format!("User {} deleted successfully!", username)
    })))
}
