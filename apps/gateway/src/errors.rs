// [apps/gateway/src/errors.rs]
//! Traduce los fallos internos del dominio al vocabulario HTTP minimo que
//! exige la superficie publica (§6, §7): el gateway nunca reenvia cuerpos
//! crudos de un upstream, solo una forma normalizada `{error, detail}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug)]
pub enum ApiError {
    MalformedRequest(String),
    MissingIdentifiers,
    InvalidState,
    Unauthorized,
    LockBusy,
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, detail) = match self {
            ApiError::MalformedRequest(detail) => (StatusCode::BAD_REQUEST, "malformed_request", detail),
            ApiError::MissingIdentifiers => {
                (StatusCode::BAD_REQUEST, "missing_identifiers", String::new())
            }
            ApiError::InvalidState => (StatusCode::FORBIDDEN, "invalid_state", String::new()),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", String::new()),
            ApiError::LockBusy => (StatusCode::CONFLICT, "lock_busy", String::new()),
            ApiError::Internal(detail) => {
                tracing::error!("internal gateway fault: {}", detail);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", String::new())
            }
        };

        let body = if detail.is_empty() {
            json!({ "error": code })
        } else {
            json!({ "error": code, "detail": detail })
        };

        (status, Json(body)).into_response()
    }
}
