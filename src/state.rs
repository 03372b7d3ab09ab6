//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::Environment;
use crate::infrastructure::TaskRepository;

// =============================================================================
// AppState
// =============================================================================

/// Shared state handed to every handler.
///
/// The store handle is created once at startup and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub task_repository: Arc<dyn TaskRepository>,

    pub environment: Environment,
}

impl AppState {
    #[must_use]
    pub fn new(task_repository: Arc<dyn TaskRepository>, environment: Environment) -> Self {
        Self {
            task_repository,
            environment,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("AppState")
            .field("environment", &self.environment)
            .finish_non_exhaustive()
    }
}
