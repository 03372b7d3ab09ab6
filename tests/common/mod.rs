//! Common test helpers for integration tests.
//!
//! This module provides shared utilities for building routers, sending
//! requests and reading JSON responses.
//!
//! # Note
//!
//! The `#![allow(dead_code)]` attribute is necessary because Rust compiles each
//! integration test file as a separate crate. Helpers used only by some test
//! files would otherwise generate dead code warnings in the others.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use futures::FutureExt;
use futures::future::BoxFuture;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use task_crud_api::config::Environment;
use task_crud_api::domain::{NewTask, Task, TaskChanges, TaskId};
use task_crud_api::infrastructure::{InMemoryTaskRepository, RepositoryError, TaskRepository};
use task_crud_api::routes::{App, create_router};
use task_crud_api::state::AppState;

// =============================================================================
// Router Creation Helpers
// =============================================================================

/// App backed by an empty in-memory store in test mode.
pub fn create_test_router() -> App {
    create_router_in(Environment::Test)
}

/// App backed by an empty in-memory store in the given environment.
pub fn create_router_in(environment: Environment) -> App {
    create_router(AppState::new(
        Arc::new(InMemoryTaskRepository::new()),
        environment,
    ))
}

/// App whose store fails every call.
pub fn create_failing_router(environment: Environment) -> App {
    create_router(AppState::new(Arc::new(FailingTaskRepository), environment))
}

// =============================================================================
// Request Helpers
// =============================================================================

/// A decoded response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Sends a request with an optional raw body and content type.
pub async fn send_raw(
    router: &App,
    method: Method,
    uri: &str,
    content_type: Option<&str>,
    body: impl Into<Body>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }

    let response = router
        .clone()
        .oneshot(builder.body(body.into()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };

    TestResponse { status, body }
}

/// Sends a request without a body.
pub async fn send(router: &App, method: Method, uri: &str) -> TestResponse {
    send_raw(router, method, uri, None, Body::empty()).await
}

/// Sends a JSON body.
pub async fn send_json(router: &App, method: Method, uri: &str, body: &Value) -> TestResponse {
    send_raw(
        router,
        method,
        uri,
        Some("application/json"),
        body.to_string(),
    )
    .await
}

/// Creates a task through the API and returns its JSON representation.
pub async fn create_task(router: &App, body: &Value) -> Value {
    let response = send_json(router, Method::POST, "/api/tasks", body).await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    response.body["data"].clone()
}

/// Path of a single task.
pub fn task_path(id: &Value) -> String {
    format!("/api/tasks/{}", id.as_str().unwrap())
}

// =============================================================================
// Failing Store
// =============================================================================

/// Store double whose every call fails with a database error.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingTaskRepository;

pub const STORE_FAILURE: &str = "connection refused";

fn store_failure<T: Send + 'static>() -> BoxFuture<'static, Result<T, RepositoryError>> {
    async { Err(RepositoryError::DatabaseError(STORE_FAILURE.to_string())) }.boxed()
}

impl TaskRepository for FailingTaskRepository {
    fn create(&self, _new_task: NewTask) -> BoxFuture<'static, Result<Task, RepositoryError>> {
        store_failure()
    }

    fn find_all(&self) -> BoxFuture<'static, Result<Vec<Task>, RepositoryError>> {
        store_failure()
    }

    fn find_by_id(&self, _id: &TaskId) -> BoxFuture<'static, Result<Option<Task>, RepositoryError>> {
        store_failure()
    }

    fn update_by_id(
        &self,
        _id: &TaskId,
        _changes: TaskChanges,
    ) -> BoxFuture<'static, Result<Option<Task>, RepositoryError>> {
        store_failure()
    }

    fn delete_by_id(
        &self,
        _id: &TaskId,
    ) -> BoxFuture<'static, Result<Option<Task>, RepositoryError>> {
        store_failure()
    }
}
