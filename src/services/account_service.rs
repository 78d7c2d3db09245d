//! Account service for business logic operations.
//!
//! Validates account input, hashes passwords before they reach the store and
//! maps missing rows to `NotFound`.

use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::{Account, AccountChanges, AccountDraft, AccountFilter, AccountPatch, NewAccount};
use crate::query::{Page, PageResolver};
use crate::repositories::AccountStore;
use crate::services::{check_min_length, check_required, list_page};
use crate::utils::password::hash_password;

const NAME_MAX: usize = 50;
const EMAIL_MAX: usize = 50;
const PHONE_MAX: usize = 11;
const PASSWORD_MIN: usize = 8;

/// Account service for handling account-related business logic.
#[derive(Clone)]
pub struct AccountService {
    store: Arc<AccountStore>,
    pages: PageResolver,
}

impl AccountService {
    pub fn new(store: Arc<AccountStore>, pages: PageResolver) -> Self {
        Self { store, pages }
    }

    /// Creates an account with a freshly generated identity.
    ///
    /// # Arguments
    /// * `draft` - Caller input; the password is hashed before storage
    ///
    /// # Returns
    /// The persisted account, or `ValidationErrors` when a field is out of bounds
    pub async fn create(&self, draft: AccountDraft) -> AppResult<Account> {
        draft.validate()?;

        let new_account = NewAccount {
            id: Uuid::new_v4().to_string(),
            password_hash: hash_password(&draft.password)?,
            first_name: draft.first_name,
            last_name: draft.last_name,
            email: draft.email,
            phone: draft.phone,
        };
        let account = self.store.create(new_account).await?;
        tracing::info!(account_id = %account.id, "Account created");
        Ok(account)
    }

    /// Gets a live account by id.
    ///
    /// # Returns
    /// The account if found, or `NotFound` error
    pub async fn get(&self, id: &str) -> AppResult<Account> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("account", "id", id))
    }

    /// Lists accounts matching `filter`, newest first.
    pub async fn list(
        &self,
        filter: &AccountFilter,
        page: i64,
        per_page: i64,
    ) -> AppResult<Page<Account>> {
        list_page(&*self.store, &self.pages, filter, page, per_page).await
    }

    pub async fn count(&self, filter: &AccountFilter) -> AppResult<i64> {
        self.store.count(filter).await
    }

    /// Applies the present fields of `patch`.
    ///
    /// An all-absent patch returns the current account without writing.
    pub async fn update(&self, id: &str, patch: AccountPatch) -> AppResult<Account> {
        if patch.is_empty() {
            return self.get(id).await;
        }

        if let Some(v) = patch.first_name.as_ref().into_option() {
            check_required("first_name", v, NAME_MAX)?;
        }
        if let Some(v) = patch.last_name.as_ref().into_option() {
            check_required("last_name", v, NAME_MAX)?;
        }
        if let Some(v) = patch.email.as_ref().into_option() {
            check_required("email", v, EMAIL_MAX)?;
        }
        if let Some(v) = patch.phone.as_ref().into_option() {
            check_required("phone", v, PHONE_MAX)?;
        }
        if let Some(v) = patch.password.as_ref().into_option() {
            check_min_length("password", v, PASSWORD_MIN)?;
        }

        let changes = AccountChanges {
            password_hash: patch
                .password
                .try_map(|p| hash_password(&p))?
                .into_option(),
            first_name: patch.first_name.into_option(),
            last_name: patch.last_name.into_option(),
            email: patch.email.into_option(),
            phone: patch.phone.into_option(),
        };

        let account = self
            .store
            .update(id, changes)
            .await?
            .ok_or_else(|| AppError::not_found("account", "id", id))?;
        tracing::info!(account_id = %account.id, "Account updated");
        Ok(account)
    }

    /// Soft-deletes an account. Existing enrollments are left untouched.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        if !self.store.soft_delete(id).await? {
            return Err(AppError::not_found("account", "id", id));
        }
        tracing::info!(account_id = %id, "Account deleted");
        Ok(())
    }
}
