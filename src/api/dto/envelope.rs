//! Success body of the response envelope.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::query::{Page, PageMeta};

/// Envelope wrapping every successful payload.
///
/// `meta` is only present on list responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self::with_status(StatusCode::OK, data)
    }

    pub fn created(data: T) -> Self {
        Self::with_status(StatusCode::CREATED, data)
    }

    fn with_status(status: StatusCode, data: T) -> Self {
        Self {
            status: status.as_u16(),
            data: Some(data),
            meta: None,
        }
    }
}

impl<T> ApiResponse<Vec<T>> {
    /// Wraps a resolved page, converting each record with `convert`.
    pub fn paged<R>(page: Page<R>, convert: impl FnMut(R) -> T) -> Self {
        let meta = page.meta;
        Self {
            status: StatusCode::OK.as_u16(),
            data: Some(page.items.into_iter().map(convert).collect()),
            meta: Some(meta),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}
