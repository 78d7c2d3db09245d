use diesel::prelude::*;
use diesel_derive_enum::DbEnum;
use jiff_diesel::Timestamp;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{Patch, RecordState};
use crate::query::{FilterField, PredicateSet};

/// Progress of an enrollment. New enrollments start as `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, DbEnum)]
#[db_enum(existing_type_path = "crate::schema::sql_types::EnrollmentStatus")]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    Pending,
    Active,
    Studying,
    Inactive,
}

impl EnrollmentStatus {
    pub const ALL: [EnrollmentStatus; 4] = [
        EnrollmentStatus::Pending,
        EnrollmentStatus::Active,
        EnrollmentStatus::Studying,
        EnrollmentStatus::Inactive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EnrollmentStatus::Pending => "pending",
            EnrollmentStatus::Active => "active",
            EnrollmentStatus::Studying => "studying",
            EnrollmentStatus::Inactive => "inactive",
        }
    }
}

impl std::fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::enrollments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Enrollment {
    pub id: String,
    pub account_id: String,
    pub course_id: String,
    pub status: EnrollmentStatus,
    pub state: RecordState,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::enrollments)]
pub struct NewEnrollment {
    pub id: String,
    pub account_id: String,
    pub course_id: String,
    pub status: EnrollmentStatus,
}

#[derive(Debug, AsChangeset, Clone, Default)]
#[diesel(table_name = crate::schema::enrollments)]
pub struct EnrollmentChanges {
    pub status: Option<EnrollmentStatus>,
}

#[derive(Debug, Clone, Validate)]
pub struct EnrollmentDraft {
    #[validate(length(min = 1, message = "account id is required"))]
    pub account_id: String,
    #[validate(length(min = 1, message = "course id is required"))]
    pub course_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrollmentPatch {
    pub status: Patch<EnrollmentStatus>,
}

impl EnrollmentPatch {
    pub fn is_empty(&self) -> bool {
        !self.status.is_present()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EnrollmentField {
    AccountId,
    CourseId,
    Status,
}

impl FilterField for EnrollmentField {
    fn name(&self) -> &'static str {
        match self {
            EnrollmentField::AccountId => "account_id",
            EnrollmentField::CourseId => "course_id",
            EnrollmentField::Status => "status",
        }
    }
}

pub type EnrollmentFilter = PredicateSet<EnrollmentField>;

impl Enrollment {
    pub fn field(&self, field: EnrollmentField) -> &str {
        match field {
            EnrollmentField::AccountId => &self.account_id,
            EnrollmentField::CourseId => &self.course_id,
            EnrollmentField::Status => self.status.as_str(),
        }
    }
}
