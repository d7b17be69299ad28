// handlers/protected/todos.rs - /todos endpoints
//
// Every single-document operation follows the same path: validate the ID,
// validate the body, run one find-and-modify, and answer 404 with
// `Cannot <action>, no todo whose ID is <id> found!` when nothing matched.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::models::{Priority, Todo, TodoChanges};
use crate::error::ApiError;
use crate::filter::{todo_filter, TodoQuery};
use crate::handlers::parse_id;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;
use crate::validation::{self, FieldCheck, Validations};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoPayload {
    pub name: Option<String>,
    pub due: Option<String>,
    pub priority: Option<String>,
    pub list_id: Option<String>,
    pub notes: Option<String>,
    pub url: Option<String>,
    pub completed: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct PriorityPayload {
    pub priority: Option<String>,
}

/// `listId` must be sent: an ID attaches, `null` detaches.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAssignmentPayload {
    #[serde(default, deserialize_with = "explicit")]
    pub list_id: Option<Option<String>>,
}

/// Present keys become `Some`, even when their value is `null`.
fn explicit<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

fn list_assignment(value: Option<Option<&str>>) -> FieldCheck {
    match value {
        None => FieldCheck::fail("listId is required; send null to remove the todo from its list"),
        Some(id) => validation::optional_object_id(id),
    }
}

/// Todo fields after validation.
struct TodoFields {
    name: String,
    due: DateTime<Utc>,
    priority: Priority,
    list_id: Option<Uuid>,
    notes: Option<String>,
    url: Option<String>,
}

fn validate(payload: &TodoPayload) -> Validations {
    Validations::new()
        .with("name", validation::name(payload.name.as_deref()))
        .with("due", validation::due(payload.due.as_deref()))
        .with("priority", validation::priority(payload.priority.as_deref()))
        .with("listId", validation::optional_object_id(payload.list_id.as_deref()))
        .with("notes", validation::notes(payload.notes.as_deref()))
        .with("url", validation::url(payload.url.as_deref()))
}

impl TodoPayload {
    fn into_fields(self) -> Result<TodoFields, ApiError> {
        validate(&self).into_result()?;

        let due = self
            .due
            .as_deref()
            .and_then(validation::parse_due)
            .ok_or_else(|| ApiError::bad_request("Due date is required"))?;
        let priority = match self.priority.as_deref() {
            Some(p) => Priority::parse(p).ok_or_else(|| ApiError::bad_request("Unknown priority"))?,
            None => Priority::default(),
        };
        let list_id = self
            .list_id
            .as_deref()
            .map(Uuid::parse_str)
            .transpose()
            .map_err(|_| ApiError::bad_request("Invalid listId"))?;

        Ok(TodoFields {
            name: self.name.unwrap_or_default(),
            due,
            priority,
            list_id,
            notes: self.notes,
            url: self.url,
        })
    }
}

/// Find-and-modify by ID, mapping a miss to the templated 404.
async fn modify(
    state: &AppState,
    user: &AuthUser,
    raw_id: &str,
    action: &str,
    changes: TodoChanges,
) -> Result<Todo, ApiError> {
    let id = parse_id(raw_id)?;
    state
        .todos
        .update_todo(id, state.todo_owner(user), changes)
        .await?
        .ok_or_else(|| ApiError::missing(action, "todo", raw_id))
}

/// POST /todos
pub async fn add_todo(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<TodoPayload>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(payload) = payload?;
    let fields = payload.into_fields()?;

    let mut todo = Todo::new(user.id, fields.name, fields.due);
    todo.priority = fields.priority;
    todo.list_id = fields.list_id;
    todo.notes = fields.notes;
    todo.url = fields.url;

    let todo = state.todos.insert_todo(todo).await?;
    tracing::info!(todo_id = %todo.id, user = %user.username, "Todo created");

    Ok(ApiResponse::created(json!({
        "todo": todo,
        "message": "Todo created successfully!"
    })))
}

/// GET /todos?listId=&due=&completed=
pub async fn get_all_todos(
    State(state): State<AppState>,
    user: AuthUser,
    query: Result<Query<TodoQuery>, QueryRejection>,
) -> ApiResult<Value> {
    let Query(query) = query?;
    let filter = todo_filter(user.id, &query, Utc::now().date_naive())?;
    let todos = state.todos.find_todos(&filter).await?;

    Ok(ApiResponse::success(json!({
        "total": todos.len(),
        "todos": todos
    })))
}

/// GET /todos/:id
pub async fn get_todo(
    State(state): State<AppState>,
    user: AuthUser,
    Path(raw_id): Path<String>,
) -> ApiResult<Value> {
    let id = parse_id(&raw_id)?;
    let todo = state
        .todos
        .find_todo(id, state.todo_owner(&user))
        .await?
        .ok_or_else(|| ApiError::missing("find", "todo", &raw_id))?;

    Ok(ApiResponse::success(json!({ "todo": todo })))
}

/// PUT /todos/:id - replaces every editable field
pub async fn update_todo(
    State(state): State<AppState>,
    user: AuthUser,
    Path(raw_id): Path<String>,
    payload: Result<Json<TodoPayload>, JsonRejection>,
) -> ApiResult<Value> {
    parse_id(&raw_id)?;
    let Json(payload) = payload?;
    let completed = payload.completed;
    let fields = payload.into_fields()?;

    let changes = TodoChanges {
        name: Some(fields.name),
        notes: Some(fields.notes),
        url: Some(fields.url),
        due: Some(fields.due),
        priority: Some(fields.priority),
        list_id: Some(fields.list_id),
        completed,
    };
    let todo = modify(&state, &user, &raw_id, "update", changes).await?;

    Ok(ApiResponse::success(json!({
        "todo": todo,
        "message": "Todo updated successfully!"
    })))
}

/// PATCH /todos/complete/:id
pub async fn complete_todo(
    State(state): State<AppState>,
    user: AuthUser,
    Path(raw_id): Path<String>,
) -> ApiResult<Value> {
    let todo = modify(&state, &user, &raw_id, "complete", TodoChanges::completed(true)).await?;

    Ok(ApiResponse::success(json!({
        "todo": todo,
        "message": "Todo marked as completed!"
    })))
}

/// PATCH /todos/uncomplete/:id
pub async fn uncomplete_todo(
    State(state): State<AppState>,
    user: AuthUser,
    Path(raw_id): Path<String>,
) -> ApiResult<Value> {
    let todo = modify(&state, &user, &raw_id, "uncomplete", TodoChanges::completed(false)).await?;

    Ok(ApiResponse::success(json!({
        "todo": todo,
        "message": "Todo marked as not completed!"
    })))
}

/// PATCH /todos/priority/:id
pub async fn update_priority(
    State(state): State<AppState>,
    user: AuthUser,
    Path(raw_id): Path<String>,
    payload: Result<Json<PriorityPayload>, JsonRejection>,
) -> ApiResult<Value> {
    parse_id(&raw_id)?;
    let Json(payload) = payload?;
    Validations::new()
        .with("priority", validation::required_priority(payload.priority.as_deref()))
        .into_result()?;
    let priority = payload
        .priority
        .as_deref()
        .and_then(Priority::parse)
        .ok_or_else(|| ApiError::bad_request("Unknown priority"))?;

    let todo = modify(&state, &user, &raw_id, "update priority", TodoChanges::priority(priority)).await?;

    Ok(ApiResponse::success(json!({
        "todo": todo,
        "message": "Todo priority updated!"
    })))
}

/// PATCH /todos/list/:id - `listId: null` detaches the todo from its list
pub async fn update_list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(raw_id): Path<String>,
    payload: Result<Json<ListAssignmentPayload>, JsonRejection>,
) -> ApiResult<Value> {
    parse_id(&raw_id)?;
    let Json(payload) = payload?;
    Validations::new()
        .with("listId", list_assignment(payload.list_id.as_ref().map(Option::as_deref)))
        .into_result()?;
    let list_id = payload
        .list_id
        .flatten()
        .as_deref()
        .map(Uuid::parse_str)
        .transpose()
        .map_err(|_| ApiError::bad_request("Invalid listId"))?;

    let todo = modify(&state, &user, &raw_id, "update list", TodoChanges::list(list_id)).await?;

    Ok(ApiResponse::success(json!({
        "todo": todo,
        "message": "Todo list updated!"
    })))
}

/// DELETE /todos/:id
pub async fn delete_todo(
    State(state): State<AppState>,
    user: AuthUser,
    Path(raw_id): Path<String>,
) -> ApiResult<Value> {
    let id = parse_id(&raw_id)?;
    let todo = state
        .todos
        .delete_todo(id, state.todo_owner(&user))
        .await?
        .ok_or_else(|| ApiError::missing("delete", "todo", &raw_id))?;
    tracing::info!(todo_id = %todo.id, user = %user.username, "Todo deleted");

    Ok(ApiResponse::success(json!({
        "todo": todo,
        "message": "Todo deleted successfully!"
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> ListAssignmentPayload {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn list_assignment_tells_missing_from_null() {
        assert_eq!(parse("{}").list_id, None);
        assert_eq!(parse(r#"{"_csrf":"abc"}"#).list_id, None);
        assert_eq!(parse(r#"{"listId":null}"#).list_id, Some(None));
        let id = Uuid::new_v4().to_string();
        assert_eq!(parse(&format!(r#"{{"listId":"{}"}}"#, id)).list_id, Some(Some(id)));
    }

    #[test]
    fn missing_list_assignment_fails_validation() {
        assert!(list_assignment(None).error);
        assert!(list_assignment(Some(None)).is_ok());
        assert!(list_assignment(Some(Some("42"))).error);
    }
}
