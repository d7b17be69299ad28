// handlers/protected/lists.rs - /lists endpoints
//
// Lists are always scoped to the caller; another user's list is a 404.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::models::{ListChanges, TodoList, DEFAULT_COLOR};
use crate::error::ApiError;
use crate::filter::list_filter;
use crate::handlers::parse_id;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;
use crate::validation::{self, Validations};

#[derive(Debug, Deserialize)]
pub struct ListPayload {
    pub name: Option<String>,
    pub color: Option<String>,
}

impl ListPayload {
    fn validate(&self) -> Result<(), ApiError> {
        Validations::new()
            .with("name", validation::name(self.name.as_deref()))
            .with("color", validation::color(self.color.as_deref()))
            .into_result()
            .map_err(ApiError::from)
    }
}

/// POST /lists
pub async fn add_list(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<ListPayload>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(payload) = payload?;
    payload.validate()?;

    let list = TodoList::new(user.id, payload.name.unwrap_or_default(), payload.color);
    let list = state.lists.insert_list(list).await?;
    tracing::info!(list_id = %list.id, user = %user.username, "List created");

    Ok(ApiResponse::created(json!({
        "list": list,
        "message": "List created successfully!"
    })))
}

/// GET /lists - newest first, capped at `api.list_page_limit`
pub async fn get_all_lists(State(state): State<AppState>, user: AuthUser) -> ApiResult<Value> {
    let filter = list_filter(user.id, state.config.api.list_page_limit);
    let lists = state.lists.find_lists(&filter).await?;

    Ok(ApiResponse::success(json!({
        "total": lists.len(),
        "lists": lists
    })))
}

/// GET /lists/:id
pub async fn get_list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(raw_id): Path<String>,
) -> ApiResult<Value> {
    let id = parse_id(&raw_id)?;
    let list = state
        .lists
        .find_list(id, user.id)
        .await?
        .ok_or_else(|| ApiError::missing("find", "list", &raw_id))?;

    Ok(ApiResponse::success(json!({ "list": list })))
}

/// PUT /lists/:id
pub async fn update_list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(raw_id): Path<String>,
    payload: Result<Json<ListPayload>, JsonRejection>,
) -> ApiResult<Value> {
    let id = parse_id(&raw_id)?;
    let Json(payload) = payload?;
    payload.validate()?;

    // full replace: an omitted color goes back to the default
    let changes = ListChanges {
        name: payload.name,
        color: Some(payload.color.unwrap_or_else(|| DEFAULT_COLOR.to_string())),
    };
    let list = state
        .lists
        .update_list(id, user.id, changes)
        .await?
        .ok_or_else(|| ApiError::missing("update", "list", &raw_id))?;

    Ok(ApiResponse::success(json!({
        "list": list,
        "message": "List updated successfully!"
    })))
}

/// DELETE /lists/:id - todos keep their now dangling `listId`
pub async fn delete_list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(raw_id): Path<String>,
) -> ApiResult<Value> {
    let id = parse_id(&raw_id)?;
    let list = state
        .lists
        .delete_list(id, user.id)
        .await?
        .ok_or_else(|| ApiError::missing("delete", "list", &raw_id))?;
    tracing::info!(list_id = %list.id, user = %user.username, "List deleted");

    Ok(ApiResponse::success(json!({
        "list": list,
        "message": "List deleted successfully!"
    })))
}
