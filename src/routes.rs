//! Routing definitions for the task API.
//!
//! This module defines all API routes and configures the Axum router
//! with handlers, middleware, and state.

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use tower_http::normalize_path::NormalizePath;
use tower_http::trace::TraceLayer;

use crate::api::handlers;
use crate::middleware::error_responder;
use crate::state::AppState;

// =============================================================================
// Router Creation
// =============================================================================

/// The complete HTTP application.
///
/// Trailing slashes are trimmed before routing, so `/api/tasks/` and
/// `/api/tasks/{id}/` reach the same handlers as their bare forms.
pub type App = NormalizePath<Router>;

/// Creates the application.
///
/// Unsupported methods on known paths answer the same 404 as unknown paths,
/// so every method router gets the `route_not_found` fallback.
///
/// # Examples
///
/// ```ignore
/// use task_crud_api::routes::create_router;
/// use task_crud_api::state::AppState;
///
/// let state = AppState::new(task_repository, environment);
/// let app = create_router(state);
///
/// task_crud_api::server::serve(&config, app).await?;
/// ```
pub fn create_router(state: AppState) -> App {
    let router = Router::new()
        .route(
            "/",
            get(handlers::api_directory).fallback(handlers::route_not_found),
        )
        .nest("/api/tasks", task_routes())
        .fallback(handlers::route_not_found)
        .layer(from_fn_with_state(state.clone(), error_responder))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    NormalizePath::trim_trailing_slash(router)
}

/// Routes mounted under `/api/tasks`.
fn task_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_tasks)
                .post(handlers::create_task)
                .fallback(handlers::route_not_found),
        )
        .route(
            "/{id}",
            get(handlers::get_task)
                .put(handlers::update_task)
                .delete(handlers::delete_task)
                .fallback(handlers::route_not_found),
        )
}

// =============================================================================
// Tests
// =============================================================================
