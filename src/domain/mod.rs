//! Domain module for task management.
//!
//! This module contains the task record, its identifier and timestamp value
//! objects, and the schema validation applied on every write.

pub mod task;
pub mod validation;

pub use task::{InvalidTaskId, NewTask, Task, TaskChanges, TaskId, Timestamp};
pub use validation::{FieldError, ValidationError};
