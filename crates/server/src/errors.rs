//! Translation of service failures into JSON error bodies.
//!
//! Every body carries `status` as `"<code> <reason>"`. Not-found and
//! constraint failures are answered with HTTP 400; the constraint body still
//! embeds `"409 Conflict"`, which existing clients rely on.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use service::ServiceError;
use thiserror::Error;
use tracing::{error, warn};
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    /// Structural problems with a request body; one message per offending field.
    #[error("validation failed: {}", .errors.join("; "))]
    Invalid { errors: Vec<String> },
    /// Unusable path or query parameter.
    #[error("{0}")]
    BadRequest(String),
}

/// `"400 Bad Request"`, `"409 Conflict"`, ...
pub fn status_line(status: StatusCode) -> String {
    format!("{} {}", status.as_u16(), status.canonical_reason().unwrap_or_default())
}

impl ApiError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid { errors: vec![message.into()] }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errs: ValidationErrors) -> Self {
        let mut errors: Vec<String> = errs
            .field_errors()
            .into_iter()
            .flat_map(|(field, list)| {
                list.iter().map(move |e| match &e.message {
                    Some(m) => m.to_string(),
                    None => format!("{field}: {}", e.code),
                })
            })
            .collect();
        errors.sort();
        Self::Invalid { errors }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let bad_request = status_line(StatusCode::BAD_REQUEST);
        match self {
            ApiError::Service(ServiceError::Validation(msg))
            | ApiError::Service(ServiceError::NotFound(msg))
            | ApiError::BadRequest(msg) => {
                warn!(error = %msg, "request rejected");
                (StatusCode::BAD_REQUEST, Json(json!({"error": msg, "status": bad_request}))).into_response()
            }
            ApiError::Service(ServiceError::Conflict(msg)) => {
                warn!(error = %msg, "data integrity violation");
                let body = json!({
                    "error": msg,
                    "status": status_line(StatusCode::CONFLICT),
                    "message": "Data integrity violation",
                });
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            ApiError::Invalid { errors } => {
                warn!(?errors, "request body validation failed");
                let body = json!({"errors": errors, "status": bad_request, "message": "Validation failed"});
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            ApiError::Service(e @ ServiceError::Db(_)) => {
                error!(error = %e, code = e.code(), "unhandled service error");
                let status = StatusCode::INTERNAL_SERVER_ERROR;
                let body = json!({"error": status.canonical_reason(), "status": status_line(status)});
                (status, Json(body)).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn render(err: ApiError) -> (StatusCode, Value) {
        let resp = err.into_response();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn status_line_uses_reason_phrase() {
        assert_eq!(status_line(StatusCode::BAD_REQUEST), "400 Bad Request");
        assert_eq!(status_line(StatusCode::CONFLICT), "409 Conflict");
    }

    #[tokio::test]
    async fn validation_and_not_found_are_bad_requests() {
        let (status, body) = render(ServiceError::Validation("User must be at least 18 years old.".into()).into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "User must be at least 18 years old.", "status": "400 Bad Request"}));

        let (status, body) = render(ServiceError::user_not_found(9).into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "User not found with id: 9");
    }

    #[tokio::test]
    async fn conflict_keeps_embedded_409_on_a_400_response() {
        let (status, body) = render(ServiceError::Conflict("duplicate key".into()).into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"error": "duplicate key", "status": "409 Conflict", "message": "Data integrity violation"})
        );
    }

    #[tokio::test]
    async fn invalid_body_lists_every_message() {
        let err = ApiError::Invalid { errors: vec!["Email is required".into(), "Last name is required".into()] };
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"], json!(["Email is required", "Last name is required"]));
        assert_eq!(body["message"], "Validation failed");
        assert_eq!(body["status"], "400 Bad Request");
    }

    #[tokio::test]
    async fn storage_failures_hide_details() {
        let (status, body) = render(ServiceError::Db("connection refused".into()).into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Internal Server Error", "status": "500 Internal Server Error"}));
    }
}
