use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::form::{SubmitError, Validity};
use crate::gateway::GatewayError;

#[derive(Debug)]
pub enum AppError {
    Forbidden(String),
    BadRequest(String),
    Invalid(Validity),
    Gateway(GatewayError),
    Internal(String),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Forbidden(msg) => write!(f, "Forbidden: {msg}"),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {msg}"),
            AppError::Invalid(validity) => {
                write!(f, "Invalid: {} field(s)", validity.errors().len())
            }
            AppError::Gateway(err) => write!(f, "Gateway Error: {err}"),
            AppError::Internal(msg) => write!(f, "Internal Error: {msg}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, json!({ "error": msg })),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::Invalid(validity) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": "Validation failed", "fields": validity.errors() }),
            ),
            AppError::Gateway(err) => {
                tracing::error!("Gateway error: {err}");
                (
                    StatusCode::BAD_GATEWAY,
                    json!({ "error": "Failed to reach endpoint service" }),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error" }),
                )
            }
        };

        (status, axum::Json(body)).into_response()
    }
}

impl From<SubmitError> for AppError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::ReadOnly => {
                AppError::Forbidden("Endpoint management is not permitted".to_string())
            }
            SubmitError::Invalid(validity) => AppError::Invalid(validity),
            SubmitError::Gateway(e) => AppError::Gateway(e),
        }
    }
}
