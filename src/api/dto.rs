//! Data Transfer Objects for the task API.
//!
//! Requests keep every field optional so that a missing `title` reaches the
//! domain constructors and is reported as a validation failure rather than a
//! decoding failure.

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use crate::domain::{NewTask, Task, TaskChanges, Timestamp, ValidationError};

// =============================================================================
// Request DTOs
// =============================================================================

/// Request body for `POST /api/tasks`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}

impl TryFrom<CreateTaskRequest> for NewTask {
    type Error = ValidationError;

    fn try_from(request: CreateTaskRequest) -> Result<Self, Self::Error> {
        Self::new(request.title, request.description, request.completed)
    }
}

/// Request body for `PUT /api/tasks/{id}`.
///
/// Omitted and `null` fields leave the stored value unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTaskRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}

impl TryFrom<UpdateTaskRequest> for TaskChanges {
    type Error = ValidationError;

    fn try_from(request: UpdateTaskRequest) -> Result<Self, Self::Error> {
        Self::new(request.title, request.description, request.completed)
    }
}

// =============================================================================
// Response DTOs
// =============================================================================

/// Task representation in API responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: String,
    pub updated_at: String,
}

fn render_timestamp(timestamp: &Timestamp) -> String {
    timestamp
        .as_datetime()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl From<&Task> for TaskResponse {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.to_string(),
            title: task.title.clone(),
            description: task.description.clone(),
            completed: task.completed,
            created_at: render_timestamp(&task.created_at),
            updated_at: render_timestamp(&task.updated_at),
        }
    }
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self::from(&task)
    }
}

/// `{ "success": true, "data": ... }`
#[derive(Debug, Clone, Serialize)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> DataResponse<T> {
    #[must_use]
    pub const fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// `{ "success": true, "count": n, "data": [...] }`
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<TaskResponse>,
}

impl From<Vec<Task>> for ListResponse {
    fn from(tasks: Vec<Task>) -> Self {
        let data: Vec<TaskResponse> = tasks.iter().map(TaskResponse::from).collect();
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}

/// Serializes as `{}`.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct EmptyObject {}

/// Body of a successful delete.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: &'static str,
    pub data: EmptyObject,
}

impl Default for DeleteResponse {
    fn default() -> Self {
        Self {
            success: true,
            message: "Task deleted successfully",
            data: EmptyObject {},
        }
    }
}

// =============================================================================
// Endpoint Directory
// =============================================================================

/// Static description of the API served at `GET /`.
#[derive(Debug, Clone, Serialize)]
pub struct ApiDirectory {
    pub message: &'static str,
    pub endpoints: EndpointDirectory,
}

/// Endpoint keys in the order they are listed to clients.
#[derive(Debug, Clone, Serialize)]
pub struct EndpointDirectory {
    #[serde(rename = "GET /api/tasks")]
    pub list: &'static str,
    #[serde(rename = "POST /api/tasks")]
    pub create: &'static str,
    #[serde(rename = "GET /api/tasks/:id")]
    pub get: &'static str,
    #[serde(rename = "PUT /api/tasks/:id")]
    pub update: &'static str,
    #[serde(rename = "DELETE /api/tasks/:id")]
    pub delete: &'static str,
}

impl Default for ApiDirectory {
    fn default() -> Self {
        Self {
            message: "Welcome to Task CRUD API",
            endpoints: EndpointDirectory {
                list: "Get all tasks",
                create: "Create a new task",
                get: "Get a single task",
                update: "Update a task",
                delete: "Delete a task",
            },
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
