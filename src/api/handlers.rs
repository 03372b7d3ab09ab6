//! HTTP handlers for the task API.
//!
//! Each handler validates its input, makes at most one store call and shapes
//! the response envelope. Failures are returned as [`ApiError`] and rendered
//! by the centralized error responder.

use axum::{Json, extract::State, http::StatusCode};

use super::dto::{
    ApiDirectory, CreateTaskRequest, DataResponse, DeleteResponse, ListResponse, TaskResponse,
    UpdateTaskRequest,
};
use super::error::ApiError;
use super::extract::{TaskIdPath, TaskPayload};
use crate::domain::{NewTask, TaskChanges};
use crate::state::AppState;

// =============================================================================
// Collection Handlers
// =============================================================================

/// `GET /api/tasks`
///
/// Lists every task, newest first.
///
/// # Errors
///
/// Returns `ApiError::Store` if the store fails.
pub async fn list_tasks(State(state): State<AppState>) -> Result<Json<ListResponse>, ApiError> {
    let tasks = state.task_repository.find_all().await?;

    tracing::debug!(count = tasks.len(), "Listed tasks");

    Ok(Json(ListResponse::from(tasks)))
}

/// `POST /api/tasks`
///
/// # Errors
///
/// - `ApiError::InvalidBody` if the body cannot be decoded
/// - `ApiError::Validation` if the title is missing or blank
/// - `ApiError::Store` if the store fails
pub async fn create_task(
    State(state): State<AppState>,
    TaskPayload(request): TaskPayload<CreateTaskRequest>,
) -> Result<(StatusCode, Json<DataResponse<TaskResponse>>), ApiError> {
    let new_task = NewTask::try_from(request)?;

    let task = state.task_repository.create(new_task).await?;

    tracing::debug!(task_id = %task.id, "Created task");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(TaskResponse::from(task))),
    ))
}

// =============================================================================
// Item Handlers
// =============================================================================

/// `GET /api/tasks/{id}`
///
/// # Errors
///
/// - `ApiError::MalformedId` if the `{id}` segment is not a UUID
/// - `ApiError::NotFound` if no task has `id`
pub async fn get_task(
    State(state): State<AppState>,
    TaskIdPath(task_id): TaskIdPath,
) -> Result<Json<DataResponse<TaskResponse>>, ApiError> {
    let task = state
        .task_repository
        .find_by_id(&task_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(DataResponse::new(TaskResponse::from(task))))
}

/// `PUT /api/tasks/{id}`
///
/// Applies the supplied fields and keeps the rest.
///
/// # Errors
///
/// - `ApiError::MalformedId` if the `{id}` segment is not a UUID
/// - `ApiError::InvalidBody` if the body cannot be decoded
/// - `ApiError::Validation` if a supplied title is blank
/// - `ApiError::NotFound` if no task has `id`
pub async fn update_task(
    State(state): State<AppState>,
    TaskIdPath(task_id): TaskIdPath,
    TaskPayload(request): TaskPayload<UpdateTaskRequest>,
) -> Result<Json<DataResponse<TaskResponse>>, ApiError> {
    let changes = TaskChanges::try_from(request)?;

    let task = state
        .task_repository
        .update_by_id(&task_id, changes)
        .await?
        .ok_or(ApiError::NotFound)?;

    tracing::debug!(task_id = %task.id, "Updated task");

    Ok(Json(DataResponse::new(TaskResponse::from(task))))
}

/// `DELETE /api/tasks/{id}`
///
/// # Errors
///
/// - `ApiError::MalformedId` if the `{id}` segment is not a UUID
/// - `ApiError::NotFound` if no task has `id`
pub async fn delete_task(
    State(state): State<AppState>,
    TaskIdPath(task_id): TaskIdPath,
) -> Result<Json<DeleteResponse>, ApiError> {
    state
        .task_repository
        .delete_by_id(&task_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    tracing::debug!(task_id = %task_id, "Deleted task");

    Ok(Json(DeleteResponse::default()))
}

// =============================================================================
// Host Handlers
// =============================================================================

/// `GET /`
pub async fn api_directory() -> Json<ApiDirectory> {
    Json(ApiDirectory::default())
}

/// Fallback for any unmatched method or path.
pub async fn route_not_found() -> ApiError {
    ApiError::RouteNotFound
}
