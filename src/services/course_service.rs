//! Course service for business logic operations.

use std::sync::Arc;

use jiff::civil::Date;
use jiff_diesel::ToDiesel;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::{Course, CourseChanges, CourseDraft, CourseFilter, CoursePatch, NewCourse};
use crate::query::{Page, PageResolver};
use crate::repositories::CourseStore;
use crate::services::{check_required, list_page};

const NAME_MAX: usize = 50;
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a `YYYY-MM-DD` calendar date.
///
/// Only the canonical form is accepted: the value must print back
/// unchanged, so unpadded fields, short years, signs and surrounding
/// whitespace are rejected. No ordering between start and end dates is
/// enforced.
pub fn parse_date(field: &str, value: &str) -> AppResult<Date> {
    let date = Date::strptime(DATE_FORMAT, value).map_err(|e| {
        AppError::validation(field, format!("invalid date '{}', expected YYYY-MM-DD: {}", value, e))
    })?;
    if date.strftime(DATE_FORMAT).to_string() != value {
        return Err(AppError::validation(
            field,
            format!("invalid date '{}', expected YYYY-MM-DD", value),
        ));
    }
    Ok(date)
}

#[derive(Clone)]
pub struct CourseService {
    store: Arc<CourseStore>,
    pages: PageResolver,
}

impl CourseService {
    pub fn new(store: Arc<CourseStore>, pages: PageResolver) -> Self {
        Self { store, pages }
    }

    /// Creates a course after parsing both dates.
    ///
    /// # Returns
    /// The persisted course, or a validation error when the name is out of
    /// bounds or either date does not parse
    pub async fn create(&self, draft: CourseDraft) -> AppResult<Course> {
        draft.validate()?;
        let start_date = parse_date("start_date", &draft.start_date)?;
        let end_date = parse_date("end_date", &draft.end_date)?;

        let course = self
            .store
            .create(NewCourse {
                id: Uuid::new_v4().to_string(),
                name: draft.name,
                start_date: start_date.to_diesel(),
                end_date: end_date.to_diesel(),
            })
            .await?;
        tracing::info!(course_id = %course.id, "Course created");
        Ok(course)
    }

    pub async fn get(&self, id: &str) -> AppResult<Course> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("course", "id", id))
    }

    pub async fn list(
        &self,
        filter: &CourseFilter,
        page: i64,
        per_page: i64,
    ) -> AppResult<Page<Course>> {
        list_page(&*self.store, &self.pages, filter, page, per_page).await
    }

    pub async fn count(&self, filter: &CourseFilter) -> AppResult<i64> {
        self.store.count(filter).await
    }

    /// Applies the present fields of `patch`; an all-absent patch is a no-op.
    pub async fn update(&self, id: &str, patch: CoursePatch) -> AppResult<Course> {
        if patch.is_empty() {
            return self.get(id).await;
        }

        if let Some(name) = patch.name.as_ref().into_option() {
            check_required("name", name, NAME_MAX)?;
        }
        let changes = CourseChanges {
            start_date: patch
                .start_date
                .try_map(|d| parse_date("start_date", &d))?
                .map(|d| d.to_diesel())
                .into_option(),
            end_date: patch
                .end_date
                .try_map(|d| parse_date("end_date", &d))?
                .map(|d| d.to_diesel())
                .into_option(),
            name: patch.name.into_option(),
        };

        let course = self
            .store
            .update(id, changes)
            .await?
            .ok_or_else(|| AppError::not_found("course", "id", id))?;
        tracing::info!(course_id = %course.id, "Course updated");
        Ok(course)
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        if !self.store.soft_delete(id).await? {
            return Err(AppError::not_found("course", "id", id));
        }
        tracing::info!(course_id = %id, "Course deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CourseField, Patch};
    use crate::repositories::memory::MemoryStore;

    fn service() -> (CourseService, Arc<MemoryStore<Course>>) {
        let store = Arc::new(MemoryStore::<Course>::new());
        (CourseService::new(store.clone(), PageResolver::new(2)), store)
    }

    fn draft(name: &str, start: &str, end: &str) -> CourseDraft {
        CourseDraft {
            name: name.to_string(),
            start_date: start.to_string(),
            end_date: end.to_string(),
        }
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("start_date", "2024-02-29").unwrap(),
            jiff::civil::date(2024, 2, 29)
        );
        for bad in [
            "2024-13-40",
            "2023-02-29",
            "2024/01/01",
            "not a date",
            "",
            "2024-1-5",
            "2024-01-5",
            "24-01-05",
            " 2024-01-05",
            "2024-01-05 ",
            "+2024-01-05",
        ] {
            assert!(
                matches!(parse_date("start_date", bad), Err(AppError::Validation { ref field, .. }) if field == "start_date"),
                "{} should not parse",
                bad
            );
        }
    }

    #[tokio::test]
    async fn test_create_parses_dates() {
        let (svc, _) = service();
        let course = svc
            .create(draft("Rust 101", "2024-01-15", "2024-03-01"))
            .await
            .unwrap();
        assert_eq!(course.start_date.to_jiff(), jiff::civil::date(2024, 1, 15));
        assert_eq!(course.end_date.to_jiff(), jiff::civil::date(2024, 3, 1));
    }

    #[tokio::test]
    async fn test_create_with_invalid_date_writes_nothing() {
        let (svc, store) = service();
        let err = svc
            .create(draft("Rust 101", "2024-13-40", "2024-03-01"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "start_date"));
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn test_end_before_start_is_accepted() {
        let (svc, _) = service();
        assert!(svc.create(draft("Backwards", "2024-06-01", "2024-01-01")).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_uses_default_page_size_and_name_filter() {
        let (svc, _) = service();
        for name in ["Intro to Rust", "Advanced RUST", "Go basics"] {
            svc.create(draft(name, "2024-01-01", "2024-02-01")).await.unwrap();
        }

        let filter = CourseFilter::new().with(CourseField::Name, Some("rust"));
        let page = svc.list(&filter, 0, 0).await.unwrap();
        assert_eq!(page.meta.per_page, 2);
        assert_eq!(page.meta.total_count, 2);
        assert_eq!(page.meta.page, 1);
        assert_eq!(page.items.len(), 2);

        let beyond = svc.list(&CourseFilter::new(), 9, 2).await.unwrap();
        assert_eq!(beyond.meta.page, 2);
        assert_eq!(beyond.items.len(), 1);
    }

    #[tokio::test]
    async fn test_update_with_bad_date_keeps_course() {
        let (svc, _) = service();
        let course = svc
            .create(draft("Rust 101", "2024-01-15", "2024-03-01"))
            .await
            .unwrap();

        let patch = CoursePatch {
            name: Patch::Present("Rust 102".to_string()),
            end_date: Patch::Present("2024-02-30".to_string()),
            ..Default::default()
        };
        assert!(svc.update(&course.id, patch).await.is_err());
        assert_eq!(svc.get(&course.id).await.unwrap().name, "Rust 101");

        let patch = CoursePatch {
            end_date: Patch::Present("2024-04-30".to_string()),
            ..Default::default()
        };
        let updated = svc.update(&course.id, patch).await.unwrap();
        assert_eq!(updated.name, "Rust 101");
        assert_eq!(updated.end_date.to_jiff(), jiff::civil::date(2024, 4, 30));
    }

    #[tokio::test]
    async fn test_update_with_non_canonical_date_keeps_course() {
        let (svc, _) = service();
        let course = svc
            .create(draft("Rust 101", "2024-01-15", "2024-03-01"))
            .await
            .unwrap();

        let patch = CoursePatch {
            start_date: Patch::Present("24-01-15".to_string()),
            ..Default::default()
        };
        let err = svc.update(&course.id, patch).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "start_date"));
        assert_eq!(
            svc.get(&course.id).await.unwrap().start_date.to_jiff(),
            jiff::civil::date(2024, 1, 15)
        );
    }

    #[tokio::test]
    async fn test_update_with_empty_name_keeps_course() {
        let (svc, _) = service();
        let course = svc
            .create(draft("Rust 101", "2024-01-15", "2024-03-01"))
            .await
            .unwrap();

        let patch = CoursePatch {
            name: Patch::Present(String::new()),
            ..Default::default()
        };
        let err = svc.update(&course.id, patch).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "name"));
        assert_eq!(svc.get(&course.id).await.unwrap().name, "Rust 101");
    }

    #[tokio::test]
    async fn test_empty_patch_leaves_course_unchanged() {
        let (svc, _) = service();
        let course = svc
            .create(draft("Rust 101", "2024-01-15", "2024-03-01"))
            .await
            .unwrap();

        let unchanged = svc.update(&course.id, CoursePatch::default()).await.unwrap();
        assert_eq!(unchanged.name, "Rust 101");
        assert_eq!(unchanged.start_date.to_jiff(), course.start_date.to_jiff());
        assert_eq!(unchanged.end_date.to_jiff(), course.end_date.to_jiff());
        assert_eq!(unchanged.updated_at.to_jiff(), course.updated_at.to_jiff());
    }

    #[tokio::test]
    async fn test_delete_twice_is_not_found() {
        let (svc, _) = service();
        let course = svc
            .create(draft("Rust 101", "2024-01-15", "2024-03-01"))
            .await
            .unwrap();
        svc.delete(&course.id).await.unwrap();
        assert!(matches!(
            svc.delete(&course.id).await.unwrap_err(),
            AppError::NotFound { .. }
        ));
    }
}
