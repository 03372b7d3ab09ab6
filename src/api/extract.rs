//! Request extraction.
//!
//! [`TaskPayload`] accepts JSON and URL-encoded bodies. A request whose
//! content type is neither, or whose JSON body is empty, is decoded as if it
//! carried an empty object. [`TaskIdPath`] reads the `{id}` segment.

use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode, header};
use axum::{Form, Json};
use serde::de::DeserializeOwned;

use super::error::ApiError;
use crate::domain::TaskId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Json,
    Form,
    Unrecognized,
}

fn body_kind(headers: &HeaderMap) -> BodyKind {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return BodyKind::Unrecognized;
    };

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match essence.split_once('/') {
        Some(("application", "json")) => BodyKind::Json,
        Some(("application", "x-www-form-urlencoded")) => BodyKind::Form,
        Some(("application", subtype)) if subtype.ends_with("+json") => BodyKind::Json,
        _ => BodyKind::Unrecognized,
    }
}

/// Body extractor that dispatches on `Content-Type`.
///
/// Decoding failures are reported as [`ApiError::InvalidBody`] with the
/// decoder's own status and message.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskPayload<T>(pub T);

impl<S, T> FromRequest<S> for TaskPayload<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        match body_kind(request.headers()) {
            BodyKind::Json => {
                let bytes = Bytes::from_request(request, state)
                    .await
                    .map_err(|rejection| {
                        ApiError::invalid_body(rejection.status(), rejection.body_text())
                    })?;
                if bytes.iter().all(u8::is_ascii_whitespace) {
                    return empty_payload();
                }
                let Json(payload) = Json::<T>::from_bytes(&bytes)?;
                Ok(Self(payload))
            }
            BodyKind::Form => {
                let Form(payload) = Form::<T>::from_request(request, state).await?;
                Ok(Self(payload))
            }
            BodyKind::Unrecognized => empty_payload(),
        }
    }
}

fn empty_payload<T: DeserializeOwned>() -> Result<TaskPayload<T>, ApiError> {
    serde_json::from_value(serde_json::json!({}))
        .map(TaskPayload)
        .map_err(|error| ApiError::invalid_body(StatusCode::BAD_REQUEST, error.to_string()))
}

/// Extracts the `{id}` path segment as a [`TaskId`].
///
/// Segments that are not UUIDs, including ones that do not percent-decode to
/// UTF-8, fail with [`ApiError::MalformedId`].
#[derive(Debug, Clone, Copy)]
pub struct TaskIdPath(pub TaskId);

impl<S> FromRequestParts<S> for TaskIdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let task_id = match Path::<String>::from_request_parts(parts, state).await {
            Ok(Path(raw)) => TaskId::parse(&raw)?,
            Err(_) => {
                let raw = parts.uri.path().rsplit('/').next().unwrap_or_default();
                TaskId::parse(raw)?
            }
        };
        Ok(Self(task_id))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::dto::CreateTaskRequest;
    use axum::body::Body;
    use axum::http::{HeaderValue, Request as HttpRequest};
    use rstest::rstest;

    #[rstest]
    #[case("application/json", BodyKind::Json)]
    #[case("application/json; charset=utf-8", BodyKind::Json)]
    #[case("Application/JSON", BodyKind::Json)]
    #[case("application/merge-patch+json", BodyKind::Json)]
    #[case("application/x-www-form-urlencoded", BodyKind::Form)]
    #[case("text/plain", BodyKind::Unrecognized)]
    #[case("multipart/form-data; boundary=x", BodyKind::Unrecognized)]
    fn test_body_kind(#[case] content_type: &str, #[case] expected: BodyKind) {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_str(content_type).unwrap(),
        );

        assert_eq!(body_kind(&headers), expected);
    }

    #[rstest]
    fn test_body_kind_without_header() {
        assert_eq!(body_kind(&HeaderMap::new()), BodyKind::Unrecognized);
    }

    #[rstest]
    #[tokio::test]
    async fn test_form_body_is_decoded() {
        let request = HttpRequest::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("title=Buy+milk&completed=true"))
            .unwrap();

        let TaskPayload(payload) = TaskPayload::<CreateTaskRequest>::from_request(request, &())
            .await
            .unwrap();

        assert_eq!(payload.title.as_deref(), Some("Buy milk"));
        assert_eq!(payload.completed, Some(true));
    }

    #[rstest]
    #[tokio::test]
    async fn test_unrecognized_body_is_empty_payload() {
        let request = HttpRequest::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from("title=ignored"))
            .unwrap();

        let TaskPayload(payload) = TaskPayload::<CreateTaskRequest>::from_request(request, &())
            .await
            .unwrap();

        assert!(payload.title.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn test_malformed_json_is_invalid_body() {
        let request = HttpRequest::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"title\":"))
            .unwrap();

        let error = TaskPayload::<CreateTaskRequest>::from_request(request, &())
            .await
            .unwrap_err();

        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
        assert!(matches!(error, ApiError::InvalidBody { .. }));
    }

    #[rstest]
    #[case("")]
    #[case("  \n")]
    #[tokio::test]
    async fn test_empty_json_body_is_empty_payload(#[case] body: &'static str) {
        let request = HttpRequest::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap();

        let TaskPayload(payload) = TaskPayload::<CreateTaskRequest>::from_request(request, &())
            .await
            .unwrap();

        assert!(payload.title.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn test_undecodable_id_segment_is_malformed_id() {
        let app = axum::Router::new().route(
            "/tasks/{id}",
            axum::routing::get(|TaskIdPath(task_id): TaskIdPath| async move {
                task_id.to_string()
            }),
        );

        let response = tower::ServiceExt::oneshot(
            app,
            HttpRequest::builder()
                .uri("/tasks/%FF")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
        let bytes = http_body_util::BodyExt::collect(response.into_body())
            .await
            .unwrap()
            .to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(
            body["message"],
            r#"Cast to TaskId failed for value "%FF" at path "id""#
        );
    }
}
