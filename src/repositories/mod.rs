//! Repository layer for data access operations.
//!
//! Every entity is reached through the [`RecordStore`] seam. The PostgreSQL
//! repositories implement it with diesel_async; unit tests substitute the
//! in-memory store from [`memory`].

mod account_repo;
mod course_repo;
mod enrollment_repo;
#[cfg(test)]
pub mod memory;

pub use account_repo::AccountRepository;
pub use course_repo::CourseRepository;
pub use enrollment_repo::EnrollmentRepository;

use std::sync::Arc;

use async_trait::async_trait;
use jiff_diesel::ToDiesel;

use crate::db::AsyncDbPool;
use crate::error::AppResult;
use crate::models::{
    Account, AccountChanges, AccountField, Course, CourseChanges, CourseField, Enrollment,
    EnrollmentChanges, EnrollmentField, NewAccount, NewCourse, NewEnrollment,
};
use crate::query::{FilterField, PredicateSet};

/// Persistence operations shared by every entity.
///
/// Reads only ever see live rows; `soft_delete` moves a row out of that set.
#[async_trait]
pub trait RecordStore: Send + Sync {
    type Record: Send;
    type New: Send;
    type Changes: Send;
    type Field: FilterField;

    async fn create(&self, new_record: Self::New) -> AppResult<Self::Record>;

    /// `None` when the id is unknown or the row is deleted.
    async fn find_by_id(&self, record_id: &str) -> AppResult<Option<Self::Record>>;

    /// Rows matching `filter`, newest first with id as tiebreaker.
    async fn list(
        &self,
        filter: &PredicateSet<Self::Field>,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<Self::Record>>;

    async fn count(&self, filter: &PredicateSet<Self::Field>) -> AppResult<i64>;

    /// Writes `changes` to a live row, `None` when no live row matches.
    async fn update(
        &self,
        record_id: &str,
        changes: Self::Changes,
    ) -> AppResult<Option<Self::Record>>;

    /// Returns false when no live row matched.
    async fn soft_delete(&self, record_id: &str) -> AppResult<bool>;
}

pub type AccountStore = dyn RecordStore<
        Record = Account,
        New = NewAccount,
        Changes = AccountChanges,
        Field = AccountField,
    >;

pub type CourseStore =
    dyn RecordStore<Record = Course, New = NewCourse, Changes = CourseChanges, Field = CourseField>;

pub type EnrollmentStore = dyn RecordStore<
        Record = Enrollment,
        New = NewEnrollment,
        Changes = EnrollmentChanges,
        Field = EnrollmentField,
    >;

/// Aggregates all stores. Cloning only bumps reference counts.
#[derive(Clone)]
pub struct Repositories {
    pub accounts: Arc<AccountStore>,
    pub courses: Arc<CourseStore>,
    pub enrollments: Arc<EnrollmentStore>,
}

impl Repositories {
    /// Creates PostgreSQL-backed repositories sharing one pool.
    pub fn new(pool: AsyncDbPool) -> Self {
        Self {
            accounts: Arc::new(AccountRepository::new(pool.clone())),
            courses: Arc::new(CourseRepository::new(pool.clone())),
            enrollments: Arc::new(EnrollmentRepository::new(pool)),
        }
    }
}

pub(crate) fn now() -> jiff_diesel::Timestamp {
    jiff::Timestamp::now().to_diesel()
}
