//! Course request and response DTOs.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::pagination::lenient_i64;
use crate::models::{Course, CourseDraft, CourseField, CourseFilter, CoursePatch, Patch};

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct CreateCourseRequest {
    #[schema(example = "Rust 101", max_length = 50)]
    pub name: String,
    #[schema(example = "2024-01-15", format = Date)]
    pub start_date: String,
    #[schema(example = "2024-03-01", format = Date)]
    pub end_date: String,
}

impl From<CreateCourseRequest> for CourseDraft {
    fn from(req: CreateCourseRequest) -> Self {
        CourseDraft {
            name: req.name,
            start_date: req.start_date,
            end_date: req.end_date,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateCourseRequest {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub name: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>, format = Date)]
    pub start_date: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>, format = Date)]
    pub end_date: Patch<String>,
}

impl From<UpdateCourseRequest> for CoursePatch {
    fn from(req: UpdateCourseRequest) -> Self {
        CoursePatch {
            name: req.name,
            start_date: req.start_date,
            end_date: req.end_date,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CourseListQuery {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    #[param(value_type = Option<i64>, example = 1)]
    pub page: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    #[param(value_type = Option<i64>, example = 10)]
    pub limit: i64,
}

impl CourseListQuery {
    pub fn filter(&self) -> CourseFilter {
        CourseFilter::new().with(CourseField::Name, self.name.as_deref())
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseResponse {
    pub id: String,
    pub name: String,
    #[schema(value_type = String, format = Date)]
    pub start_date: jiff::civil::Date,
    #[schema(value_type = String, format = Date)]
    pub end_date: jiff::civil::Date,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: jiff::Timestamp,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: jiff::Timestamp,
}

impl From<Course> for CourseResponse {
    fn from(course: Course) -> Self {
        Self {
            start_date: course.start_date.to_jiff(),
            end_date: course.end_date.to_jiff(),
            created_at: course.created_at.to_jiff(),
            updated_at: course.updated_at.to_jiff(),
            id: course.id,
            name: course.name,
        }
    }
}
