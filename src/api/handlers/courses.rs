//! Course CRUD request handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::COURSE_TAG;
use crate::api::dto::{
    ApiResponse, CourseListQuery, CourseResponse, CreateCourseRequest, ErrorResponse,
    UpdateCourseRequest,
};
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::{JsonBody, QueryParams};

pub fn course_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_courses, create_course))
        .routes(routes!(get_course, update_course, delete_course))
}

/// POST /api/courses - Create course
///
/// Dates are calendar dates in `YYYY-MM-DD` form.
#[utoipa::path(
    post,
    path = "/courses",
    tag = COURSE_TAG,
    request_body = CreateCourseRequest,
    responses(
        (status = 201, description = "Course created", body = ApiResponse<CourseResponse>),
        (status = 400, description = "Invalid field", body = ErrorResponse)
    )
)]
async fn create_course(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateCourseRequest>,
) -> AppResult<ApiResponse<CourseResponse>> {
    let course = state.services.courses.create(payload.into()).await?;
    Ok(ApiResponse::created(course.into()))
}

/// GET /api/courses - List courses
#[utoipa::path(
    get,
    path = "/courses",
    tag = COURSE_TAG,
    params(CourseListQuery),
    responses(
        (status = 200, description = "One page of courses", body = ApiResponse<Vec<CourseResponse>>)
    )
)]
async fn list_courses(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<CourseListQuery>,
) -> AppResult<ApiResponse<Vec<CourseResponse>>> {
    let page = state
        .services
        .courses
        .list(&query.filter(), query.page, query.limit)
        .await?;
    Ok(ApiResponse::paged(page, CourseResponse::from))
}

/// GET /api/courses/{id} - Get course
#[utoipa::path(
    get,
    path = "/courses/{id}",
    tag = COURSE_TAG,
    params(("id" = String, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course found", body = ApiResponse<CourseResponse>),
        (status = 404, description = "Course not found", body = ErrorResponse)
    )
)]
async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<CourseResponse>> {
    let course = state.services.courses.get(&id).await?;
    Ok(ApiResponse::ok(course.into()))
}

/// PATCH /api/courses/{id} - Update course
#[utoipa::path(
    patch,
    path = "/courses/{id}",
    tag = COURSE_TAG,
    params(("id" = String, Path, description = "Course ID")),
    request_body = UpdateCourseRequest,
    responses(
        (status = 200, description = "Course updated", body = ApiResponse<CourseResponse>),
        (status = 400, description = "Invalid field", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    )
)]
async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<UpdateCourseRequest>,
) -> AppResult<ApiResponse<CourseResponse>> {
    let course = state.services.courses.update(&id, payload.into()).await?;
    Ok(ApiResponse::ok(course.into()))
}

/// DELETE /api/courses/{id} - Delete course
///
/// Enrollments that reference the course are kept.
#[utoipa::path(
    delete,
    path = "/courses/{id}",
    tag = COURSE_TAG,
    params(("id" = String, Path, description = "Course ID")),
    responses(
        (status = 204, description = "Course deleted"),
        (status = 404, description = "Course not found", body = ErrorResponse)
    )
)]
async fn delete_course(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<StatusCode> {
    state.services.courses.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
