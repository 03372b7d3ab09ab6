//! In-memory repository implementation.
//!
//! This module provides an in-memory implementation of [`TaskRepository`]
//! suitable for development and testing.
//!
//! # Features
//!
//! - Thread-safe with `Arc<RwLock<...>>`
//! - Store-assigned UUID v7 identifiers and timestamps
//! - Insertion sequence numbers for a stable newest-first listing

use std::collections::HashMap;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::sync::RwLock;

use crate::domain::{NewTask, Task, TaskChanges, TaskId, Timestamp};
use crate::infrastructure::{RepositoryError, TaskRepository};

/// A task together with the order in which it was inserted.
#[derive(Debug, Clone)]
struct StoredTask {
    task: Task,
    sequence: u64,
}

#[derive(Debug, Default)]
struct TaskTable {
    tasks: HashMap<TaskId, StoredTask>,
    next_sequence: u64,
}

// =============================================================================
// In-Memory Task Repository
// =============================================================================

/// In-memory implementation of `TaskRepository`.
///
/// # Example
///
/// ```ignore
/// use task_crud_api::infrastructure::InMemoryTaskRepository;
///
/// let repository = InMemoryTaskRepository::new();
/// let new_task = NewTask::new(Some("My Task".into()), None, None)?;
///
/// let task = repository.create(new_task).await?;
/// let found = repository.find_by_id(&task.id).await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    table: Arc<RwLock<TaskTable>>,
}

impl InMemoryTaskRepository {
    /// Creates a new empty in-memory task repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[allow(clippy::significant_drop_tightening)]
impl TaskRepository for InMemoryTaskRepository {
    fn create(&self, new_task: NewTask) -> BoxFuture<'static, Result<Task, RepositoryError>> {
        let table = Arc::clone(&self.table);
        async move {
            let mut guard = table.write().await;
            let task = Task::from_new(TaskId::generate(), new_task, Timestamp::now());
            let sequence = guard.next_sequence;
            guard.next_sequence += 1;
            guard.tasks.insert(
                task.id,
                StoredTask {
                    task: task.clone(),
                    sequence,
                },
            );
            Ok(task)
        }
        .boxed()
    }

    fn find_all(&self) -> BoxFuture<'static, Result<Vec<Task>, RepositoryError>> {
        let table = Arc::clone(&self.table);
        async move {
            let guard = table.read().await;
            let mut stored: Vec<&StoredTask> = guard.tasks.values().collect();
            stored.sort_by(|left, right| {
                right
                    .task
                    .created_at
                    .cmp(&left.task.created_at)
                    .then_with(|| right.sequence.cmp(&left.sequence))
            });
            Ok(stored.into_iter().map(|entry| entry.task.clone()).collect())
        }
        .boxed()
    }

    fn find_by_id(&self, id: &TaskId) -> BoxFuture<'static, Result<Option<Task>, RepositoryError>> {
        let table = Arc::clone(&self.table);
        let id = *id;
        async move {
            let guard = table.read().await;
            Ok(guard.tasks.get(&id).map(|entry| entry.task.clone()))
        }
        .boxed()
    }

    fn update_by_id(
        &self,
        id: &TaskId,
        changes: TaskChanges,
    ) -> BoxFuture<'static, Result<Option<Task>, RepositoryError>> {
        let table = Arc::clone(&self.table);
        let id = *id;
        async move {
            let mut guard = table.write().await;
            let Some(entry) = guard.tasks.get_mut(&id) else {
                return Ok(None);
            };
            entry.task = entry.task.apply(&changes, Timestamp::now());
            Ok(Some(entry.task.clone()))
        }
        .boxed()
    }

    fn delete_by_id(
        &self,
        id: &TaskId,
    ) -> BoxFuture<'static, Result<Option<Task>, RepositoryError>> {
        let table = Arc::clone(&self.table);
        let id = *id;
        async move {
            let mut guard = table.write().await;
            Ok(guard.tasks.remove(&id).map(|entry| entry.task))
        }
        .boxed()
    }
}

// =============================================================================
// Tests
// =============================================================================
