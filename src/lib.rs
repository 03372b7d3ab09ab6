//! # task-crud-api
//!
//! A small HTTP service that manages a single resource, a to-do task, through
//! create, list, get, update and delete endpoints under `/api/tasks`.
//!
//! Tasks are kept in a document store reached through
//! [`infrastructure::TaskRepository`]: an in-memory map for development and
//! tests, or a `PostgreSQL` JSONB table in production. The store is selected
//! at startup from [`config::AppConfig`].
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use task_crud_api::config::Environment;
//! use task_crud_api::infrastructure::InMemoryTaskRepository;
//! use task_crud_api::routes::create_router;
//! use task_crud_api::state::AppState;
//!
//! let state = AppState::new(
//!     Arc::new(InMemoryTaskRepository::new()),
//!     Environment::Development,
//! );
//! let app = create_router(state);
//! ```

#![cfg_attr(test, allow(dead_code))]

pub mod api;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod logging;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;
