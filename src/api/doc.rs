use utoipa::OpenApi;

pub const ACCOUNT_TAG: &str = "Account";
pub const COURSE_TAG: &str = "Course";
pub const ENROLLMENT_TAG: &str = "Enrollment";
pub const HEALTH_TAG: &str = "Health";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Course Registry",
        description = "Accounts, courses and the enrollments linking them",
    ),
    components(
        schemas(
            crate::api::dto::ErrorResponse,
            crate::query::PageMeta,
            crate::models::EnrollmentStatus,
        )
    ),
    tags(
        (name = ACCOUNT_TAG, description = "Account management endpoints"),
        (name = COURSE_TAG, description = "Course management endpoints"),
        (name = ENROLLMENT_TAG, description = "Enrollment endpoints"),
        (name = HEALTH_TAG, description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;
