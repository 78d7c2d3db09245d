//! Data Transfer Objects for API requests and responses.
//!
//! DTOs are organized by domain:
//! - `account`, `course`, `enrollment` - per-entity request/response DTOs
//! - `envelope` / `error` - the `{status, data, error, meta}` response envelope
//! - `pagination` - query parameter parsing shared by list endpoints

mod account;
mod course;
mod enrollment;
mod envelope;
mod error;
mod health;
mod pagination;

pub use account::{AccountListQuery, AccountResponse, CreateAccountRequest, UpdateAccountRequest};
pub use course::{CourseListQuery, CourseResponse, CreateCourseRequest, UpdateCourseRequest};
pub use enrollment::{
    CreateEnrollmentRequest, EnrollmentListQuery, EnrollmentResponse, UpdateEnrollmentRequest,
};
pub use envelope::ApiResponse;
pub use error::ErrorResponse;
pub use health::{ComponentHealth, HealthResponse, HealthStatus};
