//! Request-boundary error mapping: every failure becomes a status code
//! plus `{"error": {"code", "message", "field"?}}`.

use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use intake_core::IntakeError;
use serde::Serialize;

#[derive(Debug)]
pub enum AppError {
    Intake(IntakeError),
    /// The body could not be read as JSON at all.
    Rejected(JsonRejection),
}

impl From<IntakeError> for AppError {
    fn from(err: IntakeError) -> Self {
        Self::Intake(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Rejected(rejection)
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl AppError {
    fn parts(&self) -> (StatusCode, ErrorBody) {
        match self {
            Self::Intake(err) => {
                let status = StatusCode::from_u16(err.http_status())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                let message = match err {
                    IntakeError::Internal(_) => "internal server error".to_string(),
                    other => other.to_string(),
                };
                (
                    status,
                    ErrorBody {
                        code: err.code(),
                        message,
                        field: err.field().map(str::to_string),
                    },
                )
            }
            Self::Rejected(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => (
                StatusCode::PAYLOAD_TOO_LARGE,
                ErrorBody {
                    code: "payload_too_large",
                    message: rejection.body_text(),
                    field: Some("body".to_string()),
                },
            ),
            Self::Rejected(rejection) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "validation_error",
                    message: rejection.body_text(),
                    field: Some("body".to_string()),
                },
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            Self::Intake(err @ (IntakeError::Integrity(_) | IntakeError::Internal(_))) => {
                tracing::error!(error = %err, "Request failed");
            }
            Self::Intake(err @ IntakeError::StoreUnavailable(_)) => {
                tracing::warn!(error = %err, "Store unavailable");
            }
            Self::Intake(err) => tracing::debug!(error = %err, "Request rejected"),
            Self::Rejected(rejection) => {
                tracing::debug!(error = %rejection.body_text(), "Unreadable request body")
            }
        }

        let (status, body) = self.parts();
        let mut resp = (status, Json(serde_json::json!({ "error": body }))).into_response();
        if status == StatusCode::SERVICE_UNAVAILABLE {
            resp.headers_mut()
                .insert("retry-after", HeaderValue::from_static("3"));
        }
        resp
    }
}
