//! Account repository for async database operations.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::AppError;
use crate::models::{Account, AccountChanges, AccountField, AccountFilter, NewAccount, RecordState};
use crate::query::like_pattern;
use crate::repositories::{RecordStore, now};
use crate::schema::accounts;

/// Account repository holding an async connection pool.
#[derive(Clone)]
pub struct AccountRepository {
    pool: AsyncDbPool,
}

impl AccountRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    /// Live accounts narrowed by `filter`. Shared by `count` and `list`.
    fn live(filter: &AccountFilter) -> accounts::BoxedQuery<'static, Pg> {
        use crate::schema::accounts::dsl::*;

        let mut query = accounts.filter(state.eq(RecordState::Active)).into_boxed();
        for (field, pattern) in filter.iter() {
            let pattern = like_pattern(pattern);
            query = match field {
                AccountField::FirstName => query.filter(first_name.ilike(pattern)),
                AccountField::LastName => query.filter(last_name.ilike(pattern)),
                AccountField::Email => query.filter(email.ilike(pattern)),
            };
        }
        query
    }
}

#[async_trait]
impl RecordStore for AccountRepository {
    type Record = Account;
    type New = NewAccount;
    type Changes = AccountChanges;
    type Field = AccountField;

    async fn create(&self, new_account: NewAccount) -> Result<Account, AppError> {
        use crate::schema::accounts::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::insert_into(accounts)
            .values(&new_account)
            .returning(Account::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn find_by_id(&self, account_id: &str) -> Result<Option<Account>, AppError> {
        use crate::schema::accounts::dsl::*;
        let mut conn = self.pool.get().await?;

        accounts
            .filter(id.eq(account_id))
            .filter(state.eq(RecordState::Active))
            .select(Account::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    async fn list(
        &self,
        filter: &AccountFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Account>, AppError> {
        use crate::schema::accounts::dsl::*;
        let mut conn = self.pool.get().await?;

        Self::live(filter)
            .select(Account::as_select())
            .order((created_at.desc(), id.asc()))
            .limit(limit)
            .offset(offset)
            .load(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn count(&self, filter: &AccountFilter) -> Result<i64, AppError> {
        let mut conn = self.pool.get().await?;

        Self::live(filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    async fn update(
        &self,
        account_id: &str,
        changes: AccountChanges,
    ) -> Result<Option<Account>, AppError> {
        use crate::schema::accounts::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::update(accounts.filter(id.eq(account_id)).filter(state.eq(RecordState::Active)))
            .set((&changes, updated_at.eq(now())))
            .returning(Account::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(AppError::from)
    }

    async fn soft_delete(&self, account_id: &str) -> Result<bool, AppError> {
        use crate::schema::accounts::dsl::*;
        let mut conn = self.pool.get().await?;
        let stamp = now();

        let affected =
            diesel::update(accounts.filter(id.eq(account_id)).filter(state.eq(RecordState::Active)))
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
