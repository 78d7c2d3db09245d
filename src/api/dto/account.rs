//! Account request and response DTOs.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::pagination::lenient_i64;
use crate::models::{Account, AccountDraft, AccountField, AccountFilter, AccountPatch, Patch};

/// Account creation body. Missing fields are treated as empty strings.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct CreateAccountRequest {
    #[schema(example = "Ada", max_length = 50)]
    pub first_name: String,
    #[schema(example = "Lovelace", max_length = 50)]
    pub last_name: String,
    #[schema(example = "ada@example.com", max_length = 50)]
    pub email: String,
    #[schema(example = "5550001", max_length = 11)]
    pub phone: String,
    #[schema(example = "correct-horse", min_length = 8)]
    pub password: String,
}

impl From<CreateAccountRequest> for AccountDraft {
    fn from(req: CreateAccountRequest) -> Self {
        AccountDraft {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            phone: req.phone,
            password: req.password,
        }
    }
}

/// Sparse account update. Omitted fields keep their stored value.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateAccountRequest {
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub first_name: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub last_name: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub email: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub phone: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub password: Patch<String>,
}

impl From<UpdateAccountRequest> for AccountPatch {
    fn from(req: UpdateAccountRequest) -> Self {
        AccountPatch {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            phone: req.phone,
            password: req.password,
        }
    }
}

/// Account list query: case-insensitive substring filters plus paging.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AccountListQuery {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    /// Page number, 1-based; out-of-range values are clamped
    #[serde(default, deserialize_with = "lenient_i64")]
    #[param(value_type = Option<i64>, example = 1)]
    pub page: i64,
    /// Page size; non-positive values fall back to the configured default
    #[serde(default, deserialize_with = "lenient_i64")]
    #[param(value_type = Option<i64>, example = 10)]
    pub limit: i64,
}

impl AccountListQuery {
    pub fn filter(&self) -> AccountFilter {
        AccountFilter::new()
            .with(AccountField::FirstName, self.first_name.as_deref())
            .with(AccountField::LastName, self.last_name.as_deref())
            .with(AccountField::Email, self.email.as_deref())
    }
}

/// Account as returned by the API. The password hash never leaves the server.
#[derive(Debug, Serialize, ToSchema)]
pub struct AccountResponse {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: jiff::Timestamp,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: jiff::Timestamp,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            created_at: account.created_at.to_jiff(),
            updated_at: account.updated_at.to_jiff(),
            id: account.id,
            first_name: account.first_name,
            last_name: account.last_name,
            email: account.email,
            phone: account.phone,
        }
    }
}
