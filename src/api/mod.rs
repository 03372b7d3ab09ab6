//! HTTP surface of the task service.
//!
//! - [`dto`]: request and response bodies
//! - [`error`]: the `ApiError` taxonomy and its response rendering
//! - [`extract`]: content-type aware body extraction and the task id segment
//! - [`handlers`]: one handler per endpoint

pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;

pub use error::{ApiError, ErrorBody, ErrorReport};
pub use extract::{TaskIdPath, TaskPayload};
