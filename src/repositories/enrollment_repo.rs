//! Enrollment repository for async database operations.
//!
//! The `account_id`/`course_id` foreign keys stay in the schema as a backstop;
//! existence of both references is checked by the enrollment service before
//! an insert reaches this repository.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::AppError;
use crate::models::{
    Enrollment, EnrollmentChanges, EnrollmentField, EnrollmentFilter, EnrollmentStatus,
    NewEnrollment, RecordState,
};
use crate::query::{contains_ignore_case, like_pattern};
use crate::repositories::{RecordStore, now};
use crate::schema::enrollments;

#[derive(Clone)]
pub struct EnrollmentRepository {
    pool: AsyncDbPool,
}

impl EnrollmentRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    fn live(filter: &EnrollmentFilter) -> enrollments::BoxedQuery<'static, Pg> {
        let mut query = enrollments::table
            .filter(enrollments::state.eq(RecordState::Active))
            .into_boxed();

        for (field, pattern) in filter.iter() {
            query = match field {
                EnrollmentField::AccountId => {
                    query.filter(enrollments::account_id.ilike(like_pattern(pattern)))
                }
                EnrollmentField::CourseId => {
                    query.filter(enrollments::course_id.ilike(like_pattern(pattern)))
                }
                // Status is a PostgreSQL enum; match the pattern against the
                // label of each variant instead of casting the column.
                EnrollmentField::Status => {
                    let statuses: Vec<EnrollmentStatus> = EnrollmentStatus::ALL
                        .into_iter()
                        .filter(|s| contains_ignore_case(s.as_str(), pattern))
                        .collect();
                    query.filter(enrollments::status.eq_any(statuses))
                }
            };
        }
        query
    }
}

#[async_trait]
impl RecordStore for EnrollmentRepository {
    type Record = Enrollment;
    type New = NewEnrollment;
    type Changes = EnrollmentChanges;
    type Field = EnrollmentField;

    async fn create(&self, new_enrollment: NewEnrollment) -> Result<Enrollment, AppError> {
        let mut conn = self.pool.get().await?;

        diesel::insert_into(enrollments::table)
            .values(&new_enrollment)
            .returning(Enrollment::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn find_by_id(&self, enrollment_id: &str) -> Result<Option<Enrollment>, AppError> {
        let mut conn = self.pool.get().await?;

        enrollments::table
            .filter(enrollments::id.eq(enrollment_id))
            .filter(enrollments::state.eq(RecordState::Active))
            .select(Enrollment::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    async fn list(
        &self,
        filter: &EnrollmentFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Enrollment>, AppError> {
        let mut conn = self.pool.get().await?;

        Self::live(filter)
            .select(Enrollment::as_select())
            .order((enrollments::created_at.desc(), enrollments::id.asc()))
            .limit(limit)
            .offset(offset)
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn count(&self, filter: &EnrollmentFilter) -> Result<i64, AppError> {
        let mut conn = self.pool.get().await?;

        Self::live(filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn update(
        &self,
        enrollment_id: &str,
        changes: EnrollmentChanges,
    ) -> Result<Option<Enrollment>, AppError> {
        let mut conn = self.pool.get().await?;
        let target = enrollments::table
            .filter(enrollments::id.eq(enrollment_id))
            .filter(enrollments::state.eq(RecordState::Active));

        diesel::update(target)
            .set((&changes, enrollments::updated_at.eq(now())))
            .returning(Enrollment::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    async fn soft_delete(&self, enrollment_id: &str) -> Result<bool, AppError> {
        let mut conn = self.pool.get().await?;
        let stamp = now();
        let target = enrollments::table
            .filter(enrollments::id.eq(enrollment_id))
            .filter(enrollments::state.eq(RecordState::Active));

        let affected = diesel::update(target)
            .set((
                enrollments::state.eq(RecordState::Deleted),
                enrollments::deleted_at.eq(Some(stamp.clone())),
                enrollments::updated_at.eq(stamp),
            ))
            .execute(&mut conn)
            .await
            .map_err(AppError::from)?;
        Ok(affected > 0)
    }
}
