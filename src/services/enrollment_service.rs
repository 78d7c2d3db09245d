//! Enrollment service.
//!
//! Creation follows a check-then-write protocol: the account and the course
//! are resolved through their own services before the enrollment row is
//! written. The three steps do not share a transaction, so a reference
//! deleted between the check and the insert still gets enrolled; the foreign
//! keys only guard against ids that never existed.

use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::{
    Enrollment, EnrollmentChanges, EnrollmentDraft, EnrollmentFilter, EnrollmentPatch,
    EnrollmentStatus, NewEnrollment,
};
use crate::query::{Page, PageResolver};
use crate::repositories::EnrollmentStore;
use crate::services::{AccountService, CourseService, list_page};

#[derive(Clone)]
pub struct EnrollmentService {
    store: Arc<EnrollmentStore>,
    accounts: AccountService,
    courses: CourseService,
    pages: PageResolver,
}

impl EnrollmentService {
    pub fn new(
        store: Arc<EnrollmentStore>,
        accounts: AccountService,
        courses: CourseService,
        pages: PageResolver,
    ) -> Self {
        Self {
            store,
            accounts,
            courses,
            pages,
        }
    }

    /// Enrolls an account in a course.
    ///
    /// # Returns
    /// * `Err(AppError::ValidationErrors)` - Either id is empty
    /// * `Err(AppError::Reference)` - Account or course does not resolve; nothing is written
    /// * `Ok(Enrollment)` - New enrollment in `pending` status
    pub async fn create(&self, draft: EnrollmentDraft) -> AppResult<Enrollment> {
        draft.validate()?;

        self.accounts
            .get(&draft.account_id)
            .await
            .map_err(AppError::into_reference)?;
        self.courses
            .get(&draft.course_id)
            .await
            .map_err(AppError::into_reference)?;

        let enrollment = self
            .store
            .create(NewEnrollment {
                id: Uuid::new_v4().to_string(),
                account_id: draft.account_id,
                course_id: draft.course_id,
                status: EnrollmentStatus::Pending,
            })
            .await?;
        tracing::info!(
            enrollment_id = %enrollment.id,
            account_id = %enrollment.account_id,
            course_id = %enrollment.course_id,
            "Enrollment created"
        );
        Ok(enrollment)
    }

    pub async fn get(&self, id: &str) -> AppResult<Enrollment> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("enrollment", "id", id))
    }

    pub async fn list(
        &self,
        filter: &EnrollmentFilter,
        page: i64,
        per_page: i64,
    ) -> AppResult<Page<Enrollment>> {
        list_page(&*self.store, &self.pages, filter, page, per_page).await
    }

    pub async fn count(&self, filter: &EnrollmentFilter) -> AppResult<i64> {
        self.store.count(filter).await
    }

    /// Changes the status. References are fixed once created.
    pub async fn update(&self, id: &str, patch: EnrollmentPatch) -> AppResult<Enrollment> {
        if patch.is_empty() {
            return self.get(id).await;
        }

        let changes = EnrollmentChanges {
            status: patch.status.into_option(),
        };
        let enrollment = self
            .store
            .update(id, changes)
            .await?
            .ok_or_else(|| AppError::not_found("enrollment", "id", id))?;
        tracing::info!(enrollment_id = %enrollment.id, status = %enrollment.status, "Enrollment updated");
        Ok(enrollment)
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        if !self.store.soft_delete(id).await? {
            return Err(AppError::not_found("enrollment", "id", id));
        }
        tracing::info!(enrollment_id = %id, "Enrollment deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Account, AccountDraft, Course, CourseDraft, EnrollmentField, Patch,
    };
    use crate::repositories::memory::MemoryStore;

    struct Fixture {
        service: EnrollmentService,
        accounts: AccountService,
        courses: CourseService,
        store: Arc<MemoryStore<Enrollment>>,
    }

    fn fixture() -> Fixture {
        let pages = PageResolver::new(10);
        let accounts = AccountService::new(Arc::new(MemoryStore::<Account>::new()), pages);
        let courses = CourseService::new(Arc::new(MemoryStore::<Course>::new()), pages);
        let store = Arc::new(MemoryStore::<Enrollment>::new());
        let service =
            EnrollmentService::new(store.clone(), accounts.clone(), courses.clone(), pages);
        Fixture {
            service,
            accounts,
            courses,
            store,
        }
    }

    async fn seed(f: &Fixture) -> (String, String) {
        let account = f
            .accounts
            .create(AccountDraft {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                phone: "5550001".to_string(),
                password: "analytical".to_string(),
            })
            .await
            .unwrap();
        let course = f
            .courses
            .create(CourseDraft {
                name: "Engines".to_string(),
                start_date: "2024-01-01".to_string(),
                end_date: "2024-06-30".to_string(),
            })
            .await
            .unwrap();
        (account.id, course.id)
    }

    fn draft(account_id: &str, course_id: &str) -> EnrollmentDraft {
        EnrollmentDraft {
            account_id: account_id.to_string(),
            course_id: course_id.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_starts_pending_with_fresh_identity() {
        let f = fixture();
        let (account_id, course_id) = seed(&f).await;

        let first = f.service.create(draft(&account_id, &course_id)).await.unwrap();
        let second = f.service.create(draft(&account_id, &course_id)).await.unwrap();

        assert_eq!(first.status, EnrollmentStatus::Pending);
        assert_eq!(first.account_id, account_id);
        assert_eq!(first.course_id, course_id);
        assert_ne!(first.id, second.id);
        assert_ne!(first.id, account_id);
        assert_ne!(first.id, course_id);
    }

    #[tokio::test]
    async fn test_unknown_account_is_reference_error_and_writes_nothing() {
        let f = fixture();
        let (_, course_id) = seed(&f).await;
        let before = f.store.len();

        let err = f.service.create(draft("ghost", &course_id)).await.unwrap_err();
        match err {
            AppError::Reference { entity, value, .. } => {
                assert_eq!(entity, "account");
                assert_eq!(value, "ghost");
            }
            other => panic!("Expected Reference, got {:?}", other),
        }
        assert_eq!(f.store.len(), before);
    }

    #[tokio::test]
    async fn test_unknown_course_is_reference_error() {
        let f = fixture();
        let (account_id, _) = seed(&f).await;

        let err = f.service.create(draft(&account_id, "ghost")).await.unwrap_err();
        assert!(matches!(err, AppError::Reference { ref entity, .. } if entity == "course"));
        assert_eq!(f.store.len(), 0);
    }

    #[tokio::test]
    async fn test_deleted_course_cannot_be_referenced() {
        let f = fixture();
        let (account_id, course_id) = seed(&f).await;
        f.courses.delete(&course_id).await.unwrap();

        let err = f.service.create(draft(&account_id, &course_id)).await.unwrap_err();
        assert!(matches!(err, AppError::Reference { .. }));
    }

    #[tokio::test]
    async fn test_empty_ids_fail_validation_before_lookup() {
        let f = fixture();
        let err = f.service.create(draft("", "")).await.unwrap_err();
        match err {
            AppError::ValidationErrors { errors } => assert_eq!(errors.len(), 2),
            other => panic!("Expected ValidationErrors, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_deleting_account_keeps_existing_enrollments() {
        let f = fixture();
        let (account_id, course_id) = seed(&f).await;
        let enrollment = f.service.create(draft(&account_id, &course_id)).await.unwrap();

        f.accounts.delete(&account_id).await.unwrap();
        assert_eq!(f.service.get(&enrollment.id).await.unwrap().account_id, account_id);
    }

    #[tokio::test]
    async fn test_update_status_and_filter_by_status() {
        let f = fixture();
        let (account_id, course_id) = seed(&f).await;
        let a = f.service.create(draft(&account_id, &course_id)).await.unwrap();
        f.service.create(draft(&account_id, &course_id)).await.unwrap();

        let unchanged = f.service.update(&a.id, EnrollmentPatch::default()).await.unwrap();
        assert_eq!(unchanged.status, EnrollmentStatus::Pending);

        let patch = EnrollmentPatch {
            status: Patch::Present(EnrollmentStatus::Studying),
        };
        let updated = f.service.update(&a.id, patch).await.unwrap();
        assert_eq!(updated.status, EnrollmentStatus::Studying);

        let studying = EnrollmentFilter::new().with(EnrollmentField::Status, Some("STUD"));
        let page = f.service.list(&studying, 1, 10).await.unwrap();
        assert_eq!(page.meta.total_count, 1);
        assert_eq!(page.items[0].id, a.id);

        let by_course = EnrollmentFilter::new().with(EnrollmentField::CourseId, Some(&course_id));
        assert_eq!(f.service.count(&by_course).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_delete_twice_is_not_found() {
        let f = fixture();
        let (account_id, course_id) = seed(&f).await;
        let e = f.service.create(draft(&account_id, &course_id)).await.unwrap();

        f.service.delete(&e.id).await.unwrap();
        assert!(matches!(
            f.service.delete(&e.id).await.unwrap_err(),
            AppError::NotFound { .. }
        ));
    }
}
