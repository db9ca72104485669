//! API error types and responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use webapp_auth_core::{AuthError, ErrorClass};

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Unauthorized - missing credentials.
    #[error("unauthorized")]
    Unauthorized,

    /// Bad request - invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Init data was rejected by the verifier.
    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

const INTERNAL_MESSAGE: &str = "Authentication processing error";

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                self.to_string(),
            ),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            Self::Auth(err) => match err.class() {
                ErrorClass::ClientInput => (StatusCode::BAD_REQUEST, err.code(), err.to_string()),
                ErrorClass::Authentication => {
                    tracing::info!(code = err.code(), "Init data authentication failed");
                    (StatusCode::UNAUTHORIZED, err.code(), err.to_string())
                }
                ErrorClass::Internal => {
                    tracing::error!(error = %err, "Unexpected init data verification failure");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internal_error",
                        INTERNAL_MESSAGE.to_string(),
                    )
                }
            },
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}
