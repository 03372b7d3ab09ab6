//! Centralized error responder.
//!
//! Runs after every handler. Responses that carry an [`ErrorReport`] are
//! logged (`error!` for 5xx, `warn!` for 4xx) and, in development, re-rendered
//! with the diagnostic `stack`. All other responses pass through unchanged.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::api::ErrorReport;
use crate::state::AppState;

pub async fn error_responder(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let mut response = next.run(request).await;

    let Some(report) = response.extensions_mut().remove::<ErrorReport>() else {
        return response;
    };

    if report.status.is_server_error() {
        tracing::error!(
            %method,
            %path,
            status = report.status.as_u16(),
            error = %report.stack,
            "{}",
            report.message
        );
    } else {
        tracing::warn!(
            %method,
            %path,
            status = report.status.as_u16(),
            "{}",
            report.message
        );
    }

    if state.environment.is_development() {
        report.into_development_response()
    } else {
        response
    }
}

// =============================================================================
// Tests
// =============================================================================
