use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::LedgerError;

/// Client errors carry their reason verbatim. Storage failures are logged in
/// full and reported with a generic message so internals do not leak.
impl IntoResponse for LedgerError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            LedgerError::NotFound(reason) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", reason.to_string())
            }
            LedgerError::Conflict(reason) => {
                (StatusCode::CONFLICT, "CONFLICT", reason.to_string())
            }
            LedgerError::Validation(reason) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION_ERROR",
                reason.clone(),
            ),
            LedgerError::Storage(err) => {
                tracing::error!(error = %err, "Storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                )
            }
        };

        if status.is_client_error() {
            tracing::warn!(status = status.as_u16(), "{}", message);
        }

        (status, Json(json!({ "error": message, "code": code }))).into_response()
    }
}
