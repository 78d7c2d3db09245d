use diesel::prelude::*;
use jiff_diesel::{Date, Timestamp};
use validator::Validate;

use crate::models::{Patch, RecordState};
use crate::query::{FilterField, PredicateSet};

#[derive(Debug, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::courses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Course {
    pub id: String,
    pub name: String,
    pub start_date: Date,
    pub end_date: Date,
    pub state: RecordState,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::courses)]
pub struct NewCourse {
    pub id: String,
    pub name: String,
    pub start_date: Date,
    pub end_date: Date,
}

#[derive(Debug, AsChangeset, Clone, Default)]
#[diesel(table_name = crate::schema::courses)]
pub struct CourseChanges {
    pub name: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
}

/// Caller input for course creation. Dates are `YYYY-MM-DD` strings and are
/// parsed by the service.
#[derive(Debug, Clone, Validate)]
pub struct CourseDraft {
    #[validate(length(min = 1, max = 50, message = "name is required and must be at most 50 characters"))]
    pub name: String,
    #[validate(length(min = 1, message = "start date is required"))]
    pub start_date: String,
    #[validate(length(min = 1, message = "end date is required"))]
    pub end_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoursePatch {
    pub name: Patch<String>,
    pub start_date: Patch<String>,
    pub end_date: Patch<String>,
}

impl CoursePatch {
    pub fn is_empty(&self) -> bool {
        !(self.name.is_present() || self.start_date.is_present() || self.end_date.is_present())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CourseField {
    Name,
}

impl FilterField for CourseField {
    fn name(&self) -> &'static str {
        match self {
            CourseField::Name => "name",
        }
    }
}

pub type CourseFilter = PredicateSet<CourseField>;

impl Course {
    pub fn field(&self, field: CourseField) -> &str {
        match field {
            CourseField::Name => &self.name,
        }
    }
}
