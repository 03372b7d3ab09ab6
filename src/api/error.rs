//! API error handling.
//!
//! Every failure a handler can produce is an [`ApiError`]. Its status mapping
//! is exhaustive and its body is always `{ "success": false, "message": ... }`.
//!
//! Errors other than the two not-found cases are "unhandled": alongside the
//! production body their response carries an [`ErrorReport`] extension, which
//! the `error_responder` middleware logs and, in development, renders as a
//! `stack` field.

use std::error::Error as _;
use std::fmt::Write as _;

use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::domain::{InvalidTaskId, ValidationError};
use crate::infrastructure::RepositoryError;

// =============================================================================
// API Error
// =============================================================================

/// Failure of a task request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The identifier is well formed but no task has it.
    #[error("Task not found")]
    NotFound,

    /// No route matches the method and path.
    #[error("Route not found")]
    RouteNotFound,

    /// The payload violates the task schema.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The request body could not be decoded.
    #[error("{message}")]
    InvalidBody { status: StatusCode, message: String },

    /// The path identifier is not a UUID.
    #[error(transparent)]
    MalformedId(#[from] InvalidTaskId),

    /// The store failed.
    #[error(transparent)]
    Store(#[from] RepositoryError),
}

impl ApiError {
    /// Creates an `InvalidBody` error.
    #[must_use]
    pub fn invalid_body(status: StatusCode, message: impl Into<String>) -> Self {
        Self::InvalidBody {
            status,
            message: message.into(),
        }
    }

    /// Returns the HTTP status for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound | Self::RouteNotFound => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::InvalidBody { status, .. } => *status,
            Self::MalformedId(_) | Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns true if the centralized responder should report this error.
    #[must_use]
    pub const fn is_unhandled(&self) -> bool {
        !matches!(self, Self::NotFound | Self::RouteNotFound)
    }

    /// Debug rendering followed by the `source()` chain.
    #[must_use]
    pub fn diagnostic(&self) -> String {
        let mut rendered = format!("{self:?}");
        let mut source = self.source();
        while let Some(cause) = source {
            let _ = write!(rendered, "\n    caused by: {cause}");
            source = cause.source();
        }
        rendered
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::invalid_body(rejection.status(), rejection.body_text())
    }
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        Self::invalid_body(rejection.status(), rejection.body_text())
    }
}

// =============================================================================
// Error Body
// =============================================================================

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl ErrorBody {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            stack: None,
        }
    }

    #[must_use]
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }
}

/// Details of an unhandled error, attached to its response as an extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    pub status: StatusCode,
    pub message: String,
    pub stack: String,
}

impl ErrorReport {
    /// Renders the report as a response that exposes the stack.
    #[must_use]
    pub fn into_development_response(self) -> Response {
        let body = ErrorBody::new(self.message).with_stack(self.stack);
        (self.status, Json(body)).into_response()
    }
}

// =============================================================================
// IntoResponse Implementation
// =============================================================================

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        let report = self.is_unhandled().then(|| ErrorReport {
            status,
            message: message.clone(),
            stack: self.diagnostic(),
        });

        let mut response = (status, Json(ErrorBody::new(message))).into_response();
        if let Some(report) = report {
            response.extensions_mut().insert(report);
        }
        response
    }
}

// =============================================================================
// Tests
// =============================================================================
