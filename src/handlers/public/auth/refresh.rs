// handlers/public/auth/refresh.rs - POST /users/token handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{decode_refresh_token, issue_access_token};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::validation::{self, Validations};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

/// POST /users/token - Mint a new access token (and CSRF token)
///
/// The refresh token must verify and must still be one the account was issued.
pub async fn refresh_token(
    State(state): State<AppState>,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(payload) = payload?;

    Validations::new()
        .with("refreshToken", validation::required(payload.refresh_token.as_deref(), "Refresh token"))
        .into_result()?;
    let token = payload.refresh_token.unwrap_or_default();

    let claims = decode_refresh_token(&token, &state.config.security)?;

    let user = state
        .users
        .find_user_by_username(&claims.username)
        .await?
        .filter(|user| user.refresh_tokens.iter().any(|t| t == &token))
        .ok_or_else(|| ApiError::unauthorized("Refresh token is not recognized"))?;

    let access = issue_access_token(&user, &state.config.security)?;
    tracing::debug!(user = %user.username, "Access token refreshed");

    Ok(ApiResponse::success(json!({
        "message": "Access token refreshed!",
        "tokens": access
    })))
}
