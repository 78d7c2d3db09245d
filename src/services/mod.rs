//! Service layer for business logic operations.
//!
//! Services validate input before any write, resolve paging through the
//! shared [`PageResolver`], and translate missing rows into `NotFound`.

mod account_service;
mod course_service;
mod enrollment_service;

pub use account_service::AccountService;
pub use course_service::CourseService;
pub use enrollment_service::EnrollmentService;

use crate::error::{AppError, AppResult};
use crate::query::{Page, PageResolver, PredicateSet};
use crate::repositories::{RecordStore, Repositories};

/// Aggregates all services for convenient access.
///
/// Cloning is cheap since stores are held behind `Arc`.
#[derive(Clone)]
pub struct Services {
    pub accounts: AccountService,
    pub courses: CourseService,
    pub enrollments: EnrollmentService,
}

impl Services {
    /// Wires services over `repos`, sharing one page resolver.
    pub fn new(repos: Repositories, pages: PageResolver) -> Self {
        let accounts = AccountService::new(repos.accounts, pages);
        let courses = CourseService::new(repos.courses, pages);
        let enrollments =
            EnrollmentService::new(repos.enrollments, accounts.clone(), courses.clone(), pages);
        Self {
            accounts,
            courses,
            enrollments,
        }
    }
}

/// Counts, resolves the page, then lists with the same predicate set.
pub(crate) async fn list_page<S>(
    store: &S,
    pages: &PageResolver,
    filter: &PredicateSet<S::Field>,
    page: i64,
    per_page: i64,
) -> AppResult<Page<S::Record>>
where
    S: RecordStore + ?Sized,
{
    let total = store.count(filter).await?;
    let meta = pages.resolve(page, per_page, total)?;
    let items = store.list(filter, meta.limit(), meta.offset()).await?;
    Ok(Page { items, meta })
}

/// Rejects empty values and values longer than `max` characters.
pub(crate) fn check_required(field: &str, value: &str, max: usize) -> AppResult<()> {
    if value.is_empty() {
        return Err(AppError::validation(field, format!("{} is required", field)));
    }
    if value.chars().count() > max {
        return Err(AppError::validation(
            field,
            format!("{} must be at most {} characters", field, max),
        ));
    }
    Ok(())
}

pub(crate) fn check_min_length(field: &str, value: &str, min: usize) -> AppResult<()> {
    if value.chars().count() < min {
        return Err(AppError::validation(
            field,
            format!("{} must be at least {} characters", field, min),
        ));
    }
    Ok(())
}
