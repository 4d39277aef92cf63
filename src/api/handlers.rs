//! HTTP handlers for tasks.

use super::error::ApiErrorResponse;
use super::AppState;
use crate::tasks::{NewTask, Task, TaskChanges};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

/// Body of `GET /`.
#[derive(Debug, Serialize)]
pub struct StatusMessage {
    /// Human-readable status.
    pub message: &'static str,
}

/// `GET /`
pub async fn root() -> Json<StatusMessage> {
    Json(StatusMessage { message: "Todo App Backend is running!" })
}

/// `GET /api/tasks`
pub async fn list_tasks(
    State(state): State<AppState>,
) -> Result<Json<Vec<Task>>, ApiErrorResponse> {
    Ok(Json(state.tasks.list().await?))
}

/// `POST /api/tasks`
pub async fn create_task(
    State(state): State<AppState>,
    Json(new): Json<NewTask>,
) -> Result<(StatusCode, Json<Task>), ApiErrorResponse> {
    validate_title(&new.title)?;
    let task = state.tasks.create(new).await?;
    tracing::info!(id = task.id, labelled = task.labels.is_some(), "task created");
    Ok((StatusCode::CREATED, Json(task)))
}

/// `GET /api/tasks/{id}`
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Task>, ApiErrorResponse> {
    Ok(Json(state.tasks.get(id).await?))
}

/// `PUT /api/tasks/{id}`
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(changes): Json<TaskChanges>,
) -> Result<Json<Task>, ApiErrorResponse> {
    validate_title(&changes.title)?;
    let task = state.tasks.update(id, changes).await?;
    tracing::info!(id, "task updated");
    Ok(Json(task))
}

/// `DELETE /api/tasks/{id}`
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiErrorResponse> {
    state.tasks.delete(id).await?;
    tracing::info!(id, "task deleted");
    Ok(StatusCode::NO_CONTENT)
}

fn validate_title(title: &str) -> Result<(), ApiErrorResponse> {
    if title.trim().is_empty() {
        return Err(ApiErrorResponse::validation("title must not be empty"));
    }
    Ok(())
}
