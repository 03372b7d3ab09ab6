//! `PostgreSQL` repository implementation.
//!
//! Tasks are stored as JSONB documents using `sqlx`. The document carries the
//! user-editable fields; the identifier and timestamps live in their own
//! columns so the store can assign them and order by creation time.
//!
//! # Table Schema
//!
//! ```sql
//! CREATE TABLE IF NOT EXISTS tasks (
//!     id UUID PRIMARY KEY,
//!     data JSONB NOT NULL,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! CREATE INDEX IF NOT EXISTS idx_tasks_created_at ON tasks (created_at DESC);
//! ```

use chrono::{DateTime, Utc};
use futures::FutureExt;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{NewTask, Task, TaskChanges, TaskId, Timestamp};
use crate::infrastructure::{RepositoryError, TaskRepository};

const CREATE_TASKS_TABLE: &str = "CREATE TABLE IF NOT EXISTS tasks (\
     id UUID PRIMARY KEY, \
     data JSONB NOT NULL, \
     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(), \
     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW())";

const CREATE_CREATED_AT_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_tasks_created_at ON tasks (created_at DESC)";

/// Row shape returned by every task query.
type TaskRow = (Uuid, serde_json::Value, DateTime<Utc>, DateTime<Utc>);

// =============================================================================
// Task Document
// =============================================================================

/// The JSONB document stored in `tasks.data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct TaskDocument {
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default)]
    completed: bool,
}

impl From<&NewTask> for TaskDocument {
    fn from(new_task: &NewTask) -> Self {
        Self {
            title: new_task.title().to_string(),
            description: new_task.description().map(str::to_string),
            completed: new_task.completed(),
        }
    }
}

/// Rebuilds a domain task from a database row.
fn task_from_row((id, data, created_at, updated_at): TaskRow) -> Result<Task, RepositoryError> {
    let document: TaskDocument = serde_json::from_value(data)
        .map_err(|error| RepositoryError::SerializationError(error.to_string()))?;

    Ok(Task {
        id: TaskId::from_uuid(id),
        title: document.title,
        description: document.description,
        completed: document.completed,
        created_at: Timestamp::from_datetime(created_at),
        updated_at: Timestamp::from_datetime(updated_at),
    })
}

fn database_error(error: &sqlx::Error) -> RepositoryError {
    RepositoryError::DatabaseError(error.to_string())
}

// =============================================================================
// PostgreSQL Task Repository
// =============================================================================

/// `PostgreSQL` implementation of `TaskRepository`.
///
/// # Example
///
/// ```ignore
/// use task_crud_api::infrastructure::PostgresTaskRepository;
///
/// let pool = PgPool::connect("postgres://localhost/tasks").await?;
/// let repository = PostgresTaskRepository::new(pool);
/// repository.ensure_schema().await?;
/// ```
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    /// Connection pool for `PostgreSQL`.
    pool: PgPool,
}

impl PostgresTaskRepository {
    /// Creates a new `PostgreSQL` task repository with the given connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the `tasks` table and its ordering index if they are missing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DatabaseError` if either statement fails.
    pub async fn ensure_schema(&self) -> Result<(), RepositoryError> {
        sqlx::query(CREATE_TASKS_TABLE)
            .execute(&self.pool)
            .await
            .map_err(|error| database_error(&error))?;

        sqlx::query(CREATE_CREATED_AT_INDEX)
            .execute(&self.pool)
            .await
            .map_err(|error| database_error(&error))?;

        tracing::info!("Task schema ready");
        Ok(())
    }
}

impl TaskRepository for PostgresTaskRepository {
    fn create(&self, new_task: NewTask) -> BoxFuture<'static, Result<Task, RepositoryError>> {
        let pool = self.pool.clone();

        async move {
            let document = serde_json::to_value(TaskDocument::from(&new_task))
                .map_err(|error| RepositoryError::SerializationError(error.to_string()))?;
            let now = Utc::now();

            let row: TaskRow = sqlx::query_as(
                "INSERT INTO tasks (id, data, created_at, updated_at) \
                 VALUES ($1, $2, $3, $3) \
                 RETURNING id, data, created_at, updated_at",
            )
            .bind(TaskId::generate().as_uuid())
            .bind(&document)
            .bind(now)
            .fetch_one(&pool)
            .await
            .map_err(|error| database_error(&error))?;

            task_from_row(row)
        }
        .boxed()
    }

    fn find_all(&self) -> BoxFuture<'static, Result<Vec<Task>, RepositoryError>> {
        let pool = self.pool.clone();

        async move {
            // UUID v7 ids are time-ordered, so they break created_at ties
            let rows: Vec<TaskRow> = sqlx::query_as(
                "SELECT id, data, created_at, updated_at FROM tasks \
                 ORDER BY created_at DESC, id DESC",
            )
            .fetch_all(&pool)
            .await
            .map_err(|error| database_error(&error))?;

            rows.into_iter().map(task_from_row).collect()
        }
        .boxed()
    }

    fn find_by_id(&self, id: &TaskId) -> BoxFuture<'static, Result<Option<Task>, RepositoryError>> {
        let pool = self.pool.clone();
        let task_id = *id;

        async move {
            let row: Option<TaskRow> = sqlx::query_as(
                "SELECT id, data, created_at, updated_at FROM tasks WHERE id = $1",
            )
            .bind(task_id.as_uuid())
            .fetch_optional(&pool)
            .await
            .map_err(|error| database_error(&error))?;

            row.map(task_from_row).transpose()
        }
        .boxed()
    }

    fn update_by_id(
        &self,
        id: &TaskId,
        changes: TaskChanges,
    ) -> BoxFuture<'static, Result<Option<Task>, RepositoryError>> {
        let pool = self.pool.clone();
        let task_id = *id;

        async move {
            // Only supplied fields are serialized, so `||` leaves the rest intact
            let patch = serde_json::to_value(&changes)
                .map_err(|error| RepositoryError::SerializationError(error.to_string()))?;

            let row: Option<TaskRow> = sqlx::query_as(
                "UPDATE tasks SET data = data || $2, updated_at = $3 \
                 WHERE id = $1 \
                 RETURNING id, data, created_at, updated_at",
            )
            .bind(task_id.as_uuid())
            .bind(&patch)
            .bind(Utc::now())
            .fetch_optional(&pool)
            .await
            .map_err(|error| database_error(&error))?;

            row.map(task_from_row).transpose()
        }
        .boxed()
    }

    fn delete_by_id(
        &self,
        id: &TaskId,
    ) -> BoxFuture<'static, Result<Option<Task>, RepositoryError>> {
        let pool = self.pool.clone();
        let task_id = *id;

        async move {
            let row: Option<TaskRow> = sqlx::query_as(
                "DELETE FROM tasks WHERE id = $1 \
                 RETURNING id, data, created_at, updated_at",
            )
            .bind(task_id.as_uuid())
            .fetch_optional(&pool)
            .await
            .map_err(|error| database_error(&error))?;

            row.map(task_from_row).transpose()
        }
        .boxed()
    }
}

// =============================================================================
// Tests
// =============================================================================
