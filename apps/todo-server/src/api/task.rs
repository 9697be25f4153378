//! Task management API endpoints.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use entities::{CreateTaskDto, Task, UpdateTaskDto};
use task_store::TaskStore;

use super::{json_body, parse_id};
use crate::error::ServerResult;
use crate::state::AppState;

/// Lists all tasks.
pub async fn get_tasks<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
) -> ServerResult<Json<Vec<Task>>> {
    let tasks = state.store.get_tasks().await?;
    Ok(Json(tasks))
}

/// Gets a task by ID.
pub async fn get_task<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> ServerResult<Json<Task>> {
    let id = parse_id(&id)?;
    let task = state.store.get_task_by_id(id).await?;
    Ok(Json(task))
}

/// Creates a new task.
pub async fn create_task<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<CreateTaskDto>, JsonRejection>,
) -> ServerResult<(StatusCode, Json<Task>)> {
    let dto = json_body(payload)?;
    let task = state.store.create_task(dto).await?;

    tracing::info!(task_id = task.id, "Task created");

    Ok((StatusCode::CREATED, Json(task)))
}

/// Applies a partial update to a task.
pub async fn update_task<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTaskDto>, JsonRejection>,
) -> ServerResult<Json<Task>> {
    let id = parse_id(&id)?;
    let dto = json_body(payload)?;
    let task = state.store.update_task(id, dto).await?;

    tracing::info!(task_id = task.id, "Task updated");

    Ok(Json(task))
}

/// Deletes a task.
pub async fn delete_task<S: TaskStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> ServerResult<StatusCode> {
    let id = parse_id(&id)?;
    state.store.delete_task_by_id(id).await?;

    tracing::info!(task_id = id, "Task deleted");

    Ok(StatusCode::NO_CONTENT)
}
