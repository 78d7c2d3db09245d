//! In-memory [`RecordStore`] used by service tests.
//!
//! Evaluates the same `PredicateSet` values as the SQL repositories, keeps
//! deleted rows around like the real tables, and enforces the account
//! uniqueness rules so conflict handling can be exercised without a database.

use std::sync::Mutex;

use async_trait::async_trait;
use jiff_diesel::Timestamp;

use crate::error::{AppError, AppResult};
use crate::models::{
    Account, AccountChanges, AccountField, Course, CourseChanges, CourseField, Enrollment,
    EnrollmentChanges, EnrollmentField, NewAccount, NewCourse, NewEnrollment, RecordState,
};
use crate::query::{FilterField, PredicateSet};
use crate::repositories::{RecordStore, now};

/// Row behaviour the in-memory store needs from an entity.
pub trait MemoryRecord: Clone + Send + Sync + 'static {
    type New: Send;
    type Changes: Send;
    type Field: FilterField;

    const ENTITY: &'static str;

    fn from_new(new_record: Self::New, stamp: Timestamp) -> Self;
    fn id(&self) -> &str;
    fn state(&self) -> RecordState;
    fn created_at(&self) -> jiff::Timestamp;
    fn value_of(&self, field: Self::Field) -> &str;
    fn apply(&mut self, changes: Self::Changes, stamp: Timestamp);
    fn mark_deleted(&mut self, stamp: Timestamp);

    /// Column/value pairs that must be unique among live rows.
    fn unique_values(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

pub struct MemoryStore<R: MemoryRecord> {
    rows: Mutex<Vec<R>>,
}

impl<R: MemoryRecord> Default for MemoryStore<R> {
    fn default() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
        }
    }
}

impl<R: MemoryRecord> MemoryStore<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows, deleted ones included.
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    fn check_unique(rows: &[R], candidate: &R) -> AppResult<()> {
        for (field, value) in candidate.unique_values() {
            let clash = rows.iter().any(|row| {
                row.id() != candidate.id()
                    && row.state() == RecordState::Active
                    && row
                        .unique_values()
                        .iter()
                        .any(|(f, v)| *f == field && *v == value)
            });
            if clash {
                return Err(AppError::Duplicate {
                    entity: R::ENTITY.to_string(),
                    field: field.to_string(),
                    value,
                });
            }
        }
        Ok(())
    }

    fn matching(&self, filter: &PredicateSet<R::Field>) -> Vec<R> {
        let mut rows: Vec<R> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|row| row.state() == RecordState::Active)
            .filter(|row| filter.matches(|field| row.value_of(field)))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| a.id().cmp(b.id()))
        });
        rows
    }
}

#[async_trait]
impl<R: MemoryRecord> RecordStore for MemoryStore<R> {
    type Record = R;
    type New = R::New;
    type Changes = R::Changes;
    type Field = R::Field;

    async fn create(&self, new_record: R::New) -> AppResult<R> {
        let record = R::from_new(new_record, now());
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|row| row.id() == record.id()) {
            return Err(AppError::Duplicate {
                entity: R::ENTITY.to_string(),
                field: "id".to_string(),
                value: record.id().to_string(),
            });
        }
        Self::check_unique(&rows, &record)?;
        rows.push(record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, record_id: &str) -> AppResult<Option<R>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|row| row.id() == record_id && row.state() == RecordState::Active)
            .cloned())
    }

    async fn list(
        &self,
        filter: &PredicateSet<R::Field>,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<R>> {
        Ok(self
            .matching(filter)
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn count(&self, filter: &PredicateSet<R::Field>) -> AppResult<i64> {
        Ok(self.matching(filter).len() as i64)
    }

    async fn update(&self, record_id: &str, changes: R::Changes) -> AppResult<Option<R>> {
        let mut rows = self.rows.lock().unwrap();
        let Some(index) = rows
            .iter()
            .position(|row| row.id() == record_id && row.state() == RecordState::Active)
        else {
            return Ok(None);
        };
        let mut updated = rows[index].clone();
        updated.apply(changes, now());
        Self::check_unique(&rows, &updated)?;
        rows[index] = updated.clone();
        Ok(Some(updated))
    }

    async fn soft_delete(&self, record_id: &str) -> AppResult<bool> {
        let mut rows = self.rows.lock().unwrap();
        match rows
            .iter_mut()
            .find(|row| row.id() == record_id && row.state() == RecordState::Active)
        {
            Some(row) => {
                row.mark_deleted(now());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Mirrors a diesel changeset: `None` columns are left alone.
fn set<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

impl MemoryRecord for Account {
    type New = NewAccount;
    type Changes = AccountChanges;
    type Field = AccountField;

    const ENTITY: &'static str = "account";

    fn from_new(new: NewAccount, stamp: Timestamp) -> Self {
        Account {
            id: new.id,
            first_name: new.first_name,
            last_name: new.last_name,
            email: new.email,
            phone: new.phone,
            password_hash: new.password_hash,
            state: RecordState::Active,
            created_at: stamp.clone(),
            updated_at: stamp,
            deleted_at: None,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn state(&self) -> RecordState {
        self.state
    }

    fn created_at(&self) -> jiff::Timestamp {
        self.created_at.to_jiff()
    }

    fn value_of(&self, field: AccountField) -> &str {
        self.field(field)
    }

    fn apply(&mut self, changes: AccountChanges, stamp: Timestamp) {
        set(&mut self.first_name, changes.first_name);
        set(&mut self.last_name, changes.last_name);
        set(&mut self.email, changes.email);
        set(&mut self.phone, changes.phone);
        set(&mut self.password_hash, changes.password_hash);
        self.updated_at = stamp;
    }

    fn mark_deleted(&mut self, stamp: Timestamp) {
        self.state = RecordState::Deleted;
        self.deleted_at = Some(stamp.clone());
        self.updated_at = stamp;
    }

    fn unique_values(&self) -> Vec<(&'static str, String)> {
        vec![("email", self.email.clone()), ("phone", self.phone.clone())]
    }
}

impl MemoryRecord for Course {
    type New = NewCourse;
    type Changes = CourseChanges;
    type Field = CourseField;

    const ENTITY: &'static str = "course";

    fn from_new(new: NewCourse, stamp: Timestamp) -> Self {
        Course {
            id: new.id,
            name: new.name,
            start_date: new.start_date,
            end_date: new.end_date,
            state: RecordState::Active,
            created_at: stamp.clone(),
            updated_at: stamp,
            deleted_at: None,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn state(&self) -> RecordState {
        self.state
    }

    fn created_at(&self) -> jiff::Timestamp {
        self.created_at.to_jiff()
    }

    fn value_of(&self, field: CourseField) -> &str {
        self.field(field)
    }

    fn apply(&mut self, changes: CourseChanges, stamp: Timestamp) {
        set(&mut self.name, changes.name);
        set(&mut self.start_date, changes.start_date);
        set(&mut self.end_date, changes.end_date);
        self.updated_at = stamp;
    }

    fn mark_deleted(&mut self, stamp: Timestamp) {
        self.state = RecordState::Deleted;
        self.deleted_at = Some(stamp.clone());
        self.updated_at = stamp;
    }
}

impl MemoryRecord for Enrollment {
    type New = NewEnrollment;
    type Changes = EnrollmentChanges;
    type Field = EnrollmentField;

    const ENTITY: &'static str = "enrollment";

    fn from_new(new: NewEnrollment, stamp: Timestamp) -> Self {
        Enrollment {
            id: new.id,
            account_id: new.account_id,
            course_id: new.course_id,
            status: new.status,
            state: RecordState::Active,
            created_at: stamp.clone(),
            updated_at: stamp,
            deleted_at: None,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn state(&self) -> RecordState {
        self.state
    }

    fn created_at(&self) -> jiff::Timestamp {
        self.created_at.to_jiff()
    }

    fn value_of(&self, field: EnrollmentField) -> &str {
        self.field(field)
    }

    fn apply(&mut self, changes: EnrollmentChanges, stamp: Timestamp) {
        set(&mut self.status, changes.status);
        self.updated_at = stamp;
    }

    fn mark_deleted(&mut self, stamp: Timestamp) {
        self.state = RecordState::Deleted;
        self.deleted_at = Some(stamp.clone());
        self.updated_at = stamp;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff_diesel::ToDiesel;

    #[tokio::test]
    async fn test_update_writes_only_set_columns() {
        let store = MemoryStore::<Course>::new();
        let course = store
            .create(NewCourse {
                id: "c1".to_string(),
                name: "Rust 101".to_string(),
                start_date: jiff::civil::date(2024, 1, 15).to_diesel(),
                end_date: jiff::civil::date(2024, 3, 1).to_diesel(),
            })
            .await
            .unwrap();

        let changes = CourseChanges {
            name: Some("Rust 102".to_string()),
            ..Default::default()
        };
        let updated = store.update(&course.id, changes).await.unwrap().unwrap();
        assert_eq!(updated.name, "Rust 102");
        assert_eq!(updated.start_date.to_jiff(), jiff::civil::date(2024, 1, 15));
        assert_eq!(updated.end_date.to_jiff(), jiff::civil::date(2024, 3, 1));
    }

    #[tokio::test]
    async fn test_update_skips_deleted_rows() {
        let store = MemoryStore::<Enrollment>::new();
        let enrollment = store
            .create(NewEnrollment {
                id: "e1".to_string(),
                account_id: "a1".to_string(),
                course_id: "c1".to_string(),
                status: crate::models::EnrollmentStatus::Pending,
            })
            .await
            .unwrap();
        assert!(store.soft_delete(&enrollment.id).await.unwrap());

        let changes = EnrollmentChanges {
            status: Some(crate::models::EnrollmentStatus::Active),
        };
        assert!(store.update(&enrollment.id, changes).await.unwrap().is_none());
        assert_eq!(store.len(), 1);
    }
}
