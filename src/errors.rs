use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Domain-level failure signals plus a catch-all for infrastructure errors.
/// `TokenNotFound` and `TokenAlreadyInvalid` are distinct so callers can tell
/// "never existed" from "already retired".
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Token not found.")]
    TokenNotFound,

    #[error("Token is already invalid.")]
    TokenAlreadyInvalid,

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, code, msg) = match &self {
            AppError::TokenNotFound => (
                StatusCode::BAD_REQUEST,
                "invalid_request_error",
                "token_not_found",
                self.to_string(),
            ),
            AppError::TokenAlreadyInvalid => (
                StatusCode::CONFLICT,
                "invalid_request_error",
                "token_already_invalid",
                self.to_string(),
            ),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "internal_server_error",
                    "internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "message": msg,
                "type": error_type,
                "code": code,
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_error_messages_are_exact() {
        assert_eq!(AppError::TokenNotFound.to_string(), "Token not found.");
        assert_eq!(
            AppError::TokenAlreadyInvalid.to_string(),
            "Token is already invalid."
        );
    }
}
