use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::errors::{AppError, Context, ErrorKind};

/// Code returned for every server-side failure
pub const INTERNAL_SERVER_ERROR_CODE: &str = "INTERNAL_SERVER_ERROR";

/// Message returned for every server-side failure
pub const INTERNAL_SERVER_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// JSON error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Context>,
}

impl ErrorResponse {
    /// Generic body for server-side failures; details are never exposed
    pub fn internal() -> Self {
        Self {
            code: INTERNAL_SERVER_ERROR_CODE.to_string(),
            message: INTERNAL_SERVER_ERROR_MESSAGE.to_string(),
            details: None,
        }
    }
}

/// HTTP status for an error category
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::Unprocessable => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::Database | ErrorKind::ExternalApi | ErrorKind::Internal => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = status_for(self.kind());

        let body = if self.kind().is_client_error() {
            let details = Some(self.context().clone()).filter(|context| !context.is_empty());
            ErrorResponse {
                code: self.kind().as_str().to_string(),
                message: self.message(),
                details,
            }
        } else {
            tracing::error!(
                kind = %self.kind(),
                error = %self,
                context = ?self.context(),
                "Internal server error"
            );
            ErrorResponse::internal()
        };

        (status, Json(body)).into_response()
    }
}

/// Response for failures that never became an [`AppError`]
///
/// Installed as the panic handler of the router, so a handler that panics
/// still answers with the generic 500 body.
pub fn unhandled_error(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = err.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = err.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    tracing::warn!(error = %detail, "Unhandled error category");

    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::internal())).into_response()
}
