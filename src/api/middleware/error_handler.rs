//! Error to HTTP response mapping.
//!
//! [`AppError`] renders itself into the error envelope. The
//! [`global_error_handler`] middleware rewrites any other error response
//! (unknown route, wrong method, timeout) into the same envelope and stamps
//! the request id on every error body.

use axum::{
    Json,
    body::{Body, Bytes},
    extract::Request,
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};

use super::RequestId;
use crate::api::dto::ErrorResponse;
use crate::error::AppError;

const MAX_ERROR_BODY: usize = 64 * 1024;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = error_to_status_code(&self);
        if status.is_server_error() {
            tracing::error!(error = ?self, code = error_to_code(&self), "Request failed");
        } else {
            tracing::debug!(error = %self, code = error_to_code(&self), "Request rejected");
        }
        (status, Json(error_to_body(&self))).into_response()
    }
}

/// Builds the envelope for `error`. Server-side failures keep their source
/// out of the body.
pub fn error_to_body(error: &AppError) -> ErrorResponse {
    let status = error_to_status_code(error).as_u16();
    match error {
        AppError::NotFound { entity, field, value } => {
            ErrorResponse::not_found_error(entity, field, value)
        }
        AppError::Reference { entity, field, value } => {
            ErrorResponse::reference_error(entity, field, value)
        }
        AppError::Duplicate { entity, field, value } => {
            ErrorResponse::duplicate_error(entity, field, value)
        }
        AppError::Validation { field, reason } => ErrorResponse::validation_error(field, reason),
        AppError::ValidationErrors { errors } => {
            ErrorResponse::new(status, error_to_code(error), error.to_string())
                .with_details(json!({ "errors": errors }))
        }
        AppError::BadRequest { message } => {
            ErrorResponse::new(status, error_to_code(error), message.clone())
        }
        AppError::Configuration { key, .. } => ErrorResponse::new(
            status,
            error_to_code(error),
            format!("Configuration error for key '{}'", key),
        ),
        AppError::Database { operation, .. } => ErrorResponse::new(
            status,
            error_to_code(error),
            format!("Database operation failed: {}", operation),
        ),
        AppError::ConnectionPool { .. } => ErrorResponse::new(
            status,
            error_to_code(error),
            "Database connection unavailable",
        ),
        AppError::Internal { .. } => ErrorResponse::new(
            status,
            error_to_code(error),
            "An internal server error occurred",
        ),
    }
}

pub fn error_to_status_code(error: &AppError) -> StatusCode {
    match error {
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        AppError::Reference { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        AppError::Duplicate { .. } => StatusCode::CONFLICT,
        AppError::Validation { .. }
        | AppError::ValidationErrors { .. }
        | AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        AppError::Database { .. } | AppError::Configuration { .. } | AppError::Internal { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        AppError::ConnectionPool { .. } => StatusCode::SERVICE_UNAVAILABLE,
    }
}

pub fn error_to_code(error: &AppError) -> &'static str {
    match error {
        AppError::NotFound { .. } => "NOT_FOUND",
        AppError::Reference { .. } => "INVALID_REFERENCE",
        AppError::Duplicate { .. } => "DUPLICATE_ENTRY",
        AppError::Validation { .. } | AppError::ValidationErrors { .. } => "VALIDATION_ERROR",
        AppError::BadRequest { .. } => "BAD_REQUEST",
        AppError::Database { .. } => "DATABASE_ERROR",
        AppError::Configuration { .. } => "CONFIGURATION_ERROR",
        AppError::ConnectionPool { .. } => "SERVICE_UNAVAILABLE",
        AppError::Internal { .. } => "INTERNAL_ERROR",
    }
}

fn status_to_code(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => "BAD_REQUEST",
        StatusCode::NOT_FOUND => "NOT_FOUND",
        StatusCode::METHOD_NOT_ALLOWED => "METHOD_NOT_ALLOWED",
        StatusCode::UNSUPPORTED_MEDIA_TYPE => "UNSUPPORTED_MEDIA_TYPE",
        StatusCode::REQUEST_TIMEOUT => "REQUEST_TIMEOUT",
        StatusCode::PAYLOAD_TOO_LARGE => "PAYLOAD_TOO_LARGE",
        StatusCode::SERVICE_UNAVAILABLE => "SERVICE_UNAVAILABLE",
        s if s.is_server_error() => "INTERNAL_ERROR",
        _ => "UNKNOWN_ERROR",
    }
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"))
}

/// Normalizes every 4xx/5xx response into the error envelope.
///
/// JSON bodies produced by [`AppError`] are kept and get `request_id` added;
/// plain bodies from axum or tower-http are wrapped with their text as the
/// message.
pub async fn global_error_handler(request: Request, next: Next) -> Response {
    let request_id = request.extensions().get::<RequestId>().map(|r| r.0.clone());
    let response = next.run(request).await;

    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let json = is_json(&response);
    let (mut parts, body) = response.into_parts();
    let bytes = axum::body::to_bytes(body, MAX_ERROR_BODY)
        .await
        .unwrap_or_else(|_| Bytes::new());

    let mut envelope = match serde_json::from_slice::<Value>(&bytes) {
        Ok(value @ Value::Object(_)) if json => value,
        _ => {
            let text = String::from_utf8_lossy(&bytes).trim().to_string();
            let message = if text.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            } else {
                text
            };
            let body = ErrorResponse::new(status.as_u16(), status_to_code(status), message);
            serde_json::to_value(body).unwrap_or_else(|_| json!({}))
        }
    };

    if let (Some(id), Some(map)) = (request_id, envelope.as_object_mut()) {
        map.entry("request_id").or_insert(Value::String(id));
    }

    let body = serde_json::to_vec(&envelope).unwrap_or_default();
    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/json"),
    );
    Response::from_parts(parts, Body::from(body))
}
