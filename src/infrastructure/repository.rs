//! Repository trait for the task document store.
//!
//! The store is an external collaborator: it owns durability, assigns
//! identifiers and timestamps, and is reached only through
//! [`TaskRepository`]. Methods return boxed futures so that implementations
//! can be selected at runtime and shared as `Arc<dyn TaskRepository>`.

use futures::future::BoxFuture;
use thiserror::Error;

use crate::domain::{NewTask, Task, TaskChanges, TaskId};

// =============================================================================
// Repository Error
// =============================================================================

/// Errors that can occur during repository operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// Database connection or query error.
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

// =============================================================================
// Task Repository
// =============================================================================

/// Persistence interface for Task documents.
///
/// Absence of a record is not an error: lookups and mutations by id return
/// `Ok(None)` when nothing matches.
pub trait TaskRepository: Send + Sync {
    /// Inserts a new task, assigning its `id`, `created_at` and `updated_at`.
    fn create(&self, new_task: NewTask) -> BoxFuture<'static, Result<Task, RepositoryError>>;

    /// Returns every task, most recently created first.
    ///
    /// Tasks created within the same clock tick still come back in reverse
    /// creation order.
    fn find_all(&self) -> BoxFuture<'static, Result<Vec<Task>, RepositoryError>>;

    /// Finds a task by its ID.
    fn find_by_id(&self, id: &TaskId) -> BoxFuture<'static, Result<Option<Task>, RepositoryError>>;

    /// Merges `changes` into the task and returns the updated record.
    ///
    /// Fields absent from `changes` are left untouched; `updated_at` is
    /// refreshed even when `changes` is empty.
    fn update_by_id(
        &self,
        id: &TaskId,
        changes: TaskChanges,
    ) -> BoxFuture<'static, Result<Option<Task>, RepositoryError>>;

    /// Deletes a task and returns the removed record.
    fn delete_by_id(
        &self,
        id: &TaskId,
    ) -> BoxFuture<'static, Result<Option<Task>, RepositoryError>>;
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_repository_error_display() {
        let error = RepositoryError::DatabaseError("connection refused".to_string());
        assert_eq!(format!("{error}"), "Database error: connection refused");

        let error = RepositoryError::SerializationError("missing field `title`".to_string());
        assert_eq!(
            format!("{error}"),
            "Serialization error: missing field `title`"
        );
    }
}
