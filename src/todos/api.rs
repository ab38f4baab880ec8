//! Todo API Endpoints
//! Mission: CRUD over tasks, always scoped to the authenticated owner

use crate::auth::models::CurrentUser;
use crate::todos::{
    models::{Todo, TodoRequest},
    store::TodoStore,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

/// Shared todo state
#[derive(Clone)]
pub struct TodoState {
    pub todo_store: Arc<TodoStore>,
}

impl TodoState {
    pub fn new(todo_store: Arc<TodoStore>) -> Self {
        Self { todo_store }
    }
}

/// List the caller's todos - GET /todos
pub async fn list_todos(
    current_user: CurrentUser,
    State(state): State<TodoState>,
) -> Result<Json<Vec<Todo>>, TodoApiError> {
    let todos = state
        .todo_store
        .list_for_user(current_user.id)
        .map_err(|_| TodoApiError::InternalError)?;

    Ok(Json(todos))
}

/// Get one of the caller's todos - GET /todos/:id
///
/// A todo owned by someone else is indistinguishable from a missing one.
pub async fn get_todo(
    current_user: CurrentUser,
    State(state): State<TodoState>,
    Path(id): Path<i64>,
) -> Result<Json<Todo>, TodoApiError> {
    let todo = state
        .todo_store
        .get(id, current_user.id)
        .map_err(|_| TodoApiError::InternalError)?
        .ok_or(TodoApiError::NotFound)?;

    Ok(Json(todo))
}

/// Create a todo under the caller's ownership - POST /todos
pub async fn create_todo(
    current_user: CurrentUser,
    State(state): State<TodoState>,
    Json(payload): Json<TodoRequest>,
) -> Result<(StatusCode, Json<Todo>), TodoApiError> {
    let todo = state
        .todo_store
        .create(&payload.text, payload.complete, current_user.id)
        .map_err(|e| {
            warn!("Failed to create todo for user {}: {}", current_user.id, e);
            TodoApiError::InternalError
        })?;

    Ok((StatusCode::CREATED, Json(todo)))
}

/// Update one of the caller's todos - PUT /todos/:id
pub async fn update_todo(
    current_user: CurrentUser,
    State(state): State<TodoState>,
    Path(id): Path<i64>,
    Json(payload): Json<TodoRequest>,
) -> Result<Json<Todo>, TodoApiError> {
    let todo = state
        .todo_store
        .update(id, current_user.id, &payload.text, payload.complete)
        .map_err(|_| TodoApiError::InternalError)?
        .ok_or(TodoApiError::NotFound)?;

    Ok(Json(todo))
}

/// Delete one of the caller's todos - DELETE /todos/:id
pub async fn delete_todo(
    current_user: CurrentUser,
    State(state): State<TodoState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, TodoApiError> {
    let deleted = state
        .todo_store
        .delete(id, current_user.id)
        .map_err(|_| TodoApiError::InternalError)?;

    if !deleted {
        return Err(TodoApiError::NotFound);
    }

    info!("🗑️  Todo {} deleted by user {}", id, current_user.id);

    Ok(Json(json!({ "message": "Deleted" })))
}

/// Todo API errors
#[derive(Debug)]
pub enum TodoApiError {
    NotFound,
    InternalError,
}

impl IntoResponse for TodoApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            TodoApiError::NotFound => (StatusCode::NOT_FOUND, "No todo found"),
            TodoApiError::InternalError => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}
