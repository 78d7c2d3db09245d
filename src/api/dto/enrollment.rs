//! Enrollment request and response DTOs.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::pagination::lenient_i64;
use crate::models::{
    Enrollment, EnrollmentDraft, EnrollmentField, EnrollmentFilter, EnrollmentPatch,
    EnrollmentStatus, Patch,
};

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct CreateEnrollmentRequest {
    pub account_id: String,
    pub course_id: String,
}

impl From<CreateEnrollmentRequest> for EnrollmentDraft {
    fn from(req: CreateEnrollmentRequest) -> Self {
        EnrollmentDraft {
            account_id: req.account_id,
            course_id: req.course_id,
        }
    }
}

/// Only the status of an enrollment can change.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateEnrollmentRequest {
    #[serde(default)]
    #[schema(value_type = Option<EnrollmentStatus>)]
    pub status: Patch<EnrollmentStatus>,
}

impl From<UpdateEnrollmentRequest> for EnrollmentPatch {
    fn from(req: UpdateEnrollmentRequest) -> Self {
        EnrollmentPatch { status: req.status }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EnrollmentListQuery {
    pub account_id: Option<String>,
    pub course_id: Option<String>,
    /// Substring of the status label, e.g. `stud`
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    #[param(value_type = Option<i64>, example = 1)]
    pub page: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    #[param(value_type = Option<i64>, example = 10)]
    pub limit: i64,
}

impl EnrollmentListQuery {
    pub fn filter(&self) -> EnrollmentFilter {
        EnrollmentFilter::new()
            .with(EnrollmentField::AccountId, self.account_id.as_deref())
            .with(EnrollmentField::CourseId, self.course_id.as_deref())
            .with(EnrollmentField::Status, self.status.as_deref())
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EnrollmentResponse {
    pub id: String,
    pub account_id: String,
    pub course_id: String,
    pub status: EnrollmentStatus,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: jiff::Timestamp,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: jiff::Timestamp,
}

impl From<Enrollment> for EnrollmentResponse {
    fn from(enrollment: Enrollment) -> Self {
        Self {
            created_at: enrollment.created_at.to_jiff(),
            updated_at: enrollment.updated_at.to_jiff(),
            id: enrollment.id,
            account_id: enrollment.account_id,
            course_id: enrollment.course_id,
            status: enrollment.status,
        }
    }
}
