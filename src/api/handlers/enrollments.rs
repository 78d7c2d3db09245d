//! Enrollment request handlers.
//!
//! Creation checks that both the account and the course exist; a dangling
//! id is answered with 422 and nothing is stored.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::ENROLLMENT_TAG;
use crate::api::dto::{
    ApiResponse, CreateEnrollmentRequest, EnrollmentListQuery, EnrollmentResponse, ErrorResponse,
    UpdateEnrollmentRequest,
};
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::{JsonBody, QueryParams};

pub fn enrollment_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_enrollments, create_enrollment))
        .routes(routes!(get_enrollment, update_enrollment, delete_enrollment))
}

/// POST /api/enrollments - Enroll an account in a course
#[utoipa::path(
    post,
    path = "/enrollments",
    tag = ENROLLMENT_TAG,
    request_body = CreateEnrollmentRequest,
    responses(
        (status = 201, description = "Enrollment created as pending", body = ApiResponse<EnrollmentResponse>),
        (status = 400, description = "Missing id", body = ErrorResponse),
        (status = 422, description = "Account or course does not exist", body = ErrorResponse)
    )
)]
async fn create_enrollment(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateEnrollmentRequest>,
) -> AppResult<ApiResponse<EnrollmentResponse>> {
    let enrollment = state.services.enrollments.create(payload.into()).await?;
    Ok(ApiResponse::created(enrollment.into()))
}

/// GET /api/enrollments - List enrollments
#[utoipa::path(
    get,
    path = "/enrollments",
    tag = ENROLLMENT_TAG,
    params(EnrollmentListQuery),
    responses(
        (status = 200, description = "One page of enrollments", body = ApiResponse<Vec<EnrollmentResponse>>)
    )
)]
async fn list_enrollments(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<EnrollmentListQuery>,
) -> AppResult<ApiResponse<Vec<EnrollmentResponse>>> {
    let page = state
        .services
        .enrollments
        .list(&query.filter(), query.page, query.limit)
        .await?;
    Ok(ApiResponse::paged(page, EnrollmentResponse::from))
}

/// GET /api/enrollments/{id} - Get enrollment
#[utoipa::path(
    get,
    path = "/enrollments/{id}",
    tag = ENROLLMENT_TAG,
    params(("id" = String, Path, description = "Enrollment ID")),
    responses(
        (status = 200, description = "Enrollment found", body = ApiResponse<EnrollmentResponse>),
        (status = 404, description = "Enrollment not found", body = ErrorResponse)
    )
)]
async fn get_enrollment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<EnrollmentResponse>> {
    let enrollment = state.services.enrollments.get(&id).await?;
    Ok(ApiResponse::ok(enrollment.into()))
}

/// PATCH /api/enrollments/{id} - Change enrollment status
#[utoipa::path(
    patch,
    path = "/enrollments/{id}",
    tag = ENROLLMENT_TAG,
    params(("id" = String, Path, description = "Enrollment ID")),
    request_body = UpdateEnrollmentRequest,
    responses(
        (status = 200, description = "Enrollment updated", body = ApiResponse<EnrollmentResponse>),
        (status = 400, description = "Unknown status", body = ErrorResponse),
        (status = 404, description = "Enrollment not found", body = ErrorResponse)
    )
)]
async fn update_enrollment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<UpdateEnrollmentRequest>,
) -> AppResult<ApiResponse<EnrollmentResponse>> {
    let enrollment = state.services.enrollments.update(&id, payload.into()).await?;
    Ok(ApiResponse::ok(enrollment.into()))
}

/// DELETE /api/enrollments/{id} - Delete enrollment
#[utoipa::path(
    delete,
    path = "/enrollments/{id}",
    tag = ENROLLMENT_TAG,
    params(("id" = String, Path, description = "Enrollment ID")),
    responses(
        (status = 204, description = "Enrollment deleted"),
        (status = 404, description = "Enrollment not found", body = ErrorResponse)
    )
)]
async fn delete_enrollment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.services.enrollments.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
