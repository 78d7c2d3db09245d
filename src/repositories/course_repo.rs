//! Course repository for async database operations.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::AppError;
use crate::models::{Course, CourseChanges, CourseField, CourseFilter, NewCourse, RecordState};
use crate::query::like_pattern;
use crate::repositories::{RecordStore, now};
use crate::schema::courses;

#[derive(Clone)]
pub struct CourseRepository {
    pool: AsyncDbPool,
}

impl CourseRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    /// Live courses narrowed by `filter`. Shared by `count` and `list`.
    fn live(filter: &CourseFilter) -> courses::BoxedQuery<'static, Pg> {
        use crate::schema::courses::dsl::*;

        let mut query = courses.filter(state.eq(RecordState::Active)).into_boxed();
        if let Some(pattern) = filter.get(CourseField::Name) {
            query = query.filter(name.ilike(like_pattern(pattern)));
        }
        query
    }
}

#[async_trait]
impl RecordStore for CourseRepository {
    type Record = Course;
    type New = NewCourse;
    type Changes = CourseChanges;
    type Field = CourseField;

    async fn create(&self, new_course: NewCourse) -> Result<Course, AppError> {
        use crate::schema::courses::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::insert_into(courses)
            .values(&new_course)
            .returning(Course::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn find_by_id(&self, course_id: &str) -> Result<Option<Course>, AppError> {
        use crate::schema::courses::dsl::*;
        let mut conn = self.pool.get().await?;

        courses
            .filter(id.eq(course_id))
            .filter(state.eq(RecordState::Active))
            .select(Course::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    async fn list(
        &self,
        filter: &CourseFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Course>, AppError> {
        use crate::schema::courses::dsl::*;
        let mut conn = self.pool.get().await?;

        Self::live(filter)
            .select(Course::as_select())
            .order((created_at.desc(), id.asc()))
            .limit(limit)
            .offset(offset)
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn count(&self, filter: &CourseFilter) -> Result<i64, AppError> {
        let mut conn = self.pool.get().await?;

        Self::live(filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn update(
        &self,
        course_id: &str,
        changes: CourseChanges,
    ) -> Result<Option<Course>, AppError> {
        use crate::schema::courses::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::update(courses.filter(id.eq(course_id)).filter(state.eq(RecordState::Active)))
            .set((&changes, updated_at.eq(now())))
            .returning(Course::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    async fn soft_delete(&self, course_id: &str) -> Result<bool, AppError> {
        use crate::schema::courses::dsl::*;
        let mut conn = self.pool.get().await?;
        let stamp = now();

        let affected =
            diesel::update(courses.filter(id.eq(course_id)).filter(state.eq(RecordState::Active)))
                .set((
                    state.eq(RecordState::Deleted),
                    deleted_at.eq(Some(stamp.clone())),
                    updated_at.eq(stamp),
                ))
                .execute(&mut conn)
                .await
                .map_err(AppError::from)?;
        Ok(affected > 0)
    }
}
