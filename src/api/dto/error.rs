//! Error body of the response envelope.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use utoipa::ToSchema;

/// Error envelope returned for every failed request.
///
/// `status` repeats the HTTP status code; `error` is the human readable
/// message and `code` a stable machine readable tag.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "status": 404,
    "error": "Resource not found: account with id=5b0c",
    "code": "NOT_FOUND",
    "details": {"entity": "account", "field": "id", "value": "5b0c"},
    "request_id": "1f0e3c1e-93c6-4d5c-9a56-5e3c9cbe1c1a"
}))]
pub struct ErrorResponse {
    pub status: u16,
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ErrorResponse {
    pub fn new(status: u16, code: &str, error: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
            code: code.to_string(),
            details: None,
            request_id: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn not_found_error(entity: &str, field: &str, value: &str) -> Self {
        Self::new(
            404,
            "NOT_FOUND",
            format!("Resource not found: {} with {}={}", entity, field, value),
        )
        .with_details(json!({ "entity": entity, "field": field, "value": value }))
    }

    pub fn reference_error(entity: &str, field: &str, value: &str) -> Self {
        Self::new(
            422,
            "INVALID_REFERENCE",
            format!("Referenced {} with {}={} does not exist", entity, field, value),
        )
        .with_details(json!({ "entity": entity, "field": field, "value": value }))
    }

    pub fn duplicate_error(entity: &str, field: &str, value: &str) -> Self {
        Self::new(
            409,
            "DUPLICATE_ENTRY",
            format!("{} with {}='{}' already exists", entity, field, value),
        )
        .with_details(json!({ "entity": entity, "field": field, "value": value }))
    }

    pub fn validation_error(field: &str, reason: &str) -> Self {
        Self::new(400, "VALIDATION_ERROR", format!("{}: {}", field, reason))
            .with_details(json!({ "field": field, "reason": reason }))
    }
}
