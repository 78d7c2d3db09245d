use diesel::prelude::*;
use jiff_diesel::Timestamp;
use validator::Validate;

use crate::models::{Patch, RecordState};
use crate::query::{FilterField, PredicateSet};

/// Account row as stored. `password_hash` never leaves the service layer.
#[derive(Debug, Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Account {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub state: RecordState,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// Insert payload; the identity is assigned by the service before insert.
#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::accounts)]
pub struct NewAccount {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
}

/// Column changes for a sparse update. `None` columns are left out of the
/// generated `UPDATE`.
#[derive(Debug, AsChangeset, Clone, Default)]
#[diesel(table_name = crate::schema::accounts)]
pub struct AccountChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password_hash: Option<String>,
}

/// Caller input for account creation, before hashing.
#[derive(Debug, Clone, Validate)]
pub struct AccountDraft {
    #[validate(length(min = 1, max = 50, message = "first name is required and must be at most 50 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 50, message = "last name is required and must be at most 50 characters"))]
    pub last_name: String,
    #[validate(length(min = 1, max = 50, message = "email is required and must be at most 50 characters"))]
    pub email: String,
    #[validate(length(min = 1, max = 11, message = "phone is required and must be at most 11 characters"))]
    pub phone: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
}

/// Sparse update for an account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountPatch {
    pub first_name: Patch<String>,
    pub last_name: Patch<String>,
    pub email: Patch<String>,
    pub phone: Patch<String>,
    pub password: Patch<String>,
}

impl AccountPatch {
    pub fn is_empty(&self) -> bool {
        !(self.first_name.is_present()
            || self.last_name.is_present()
            || self.email.is_present()
            || self.phone.is_present()
            || self.password.is_present())
    }
}

/// Filterable account columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AccountField {
    FirstName,
    LastName,
    Email,
}

impl FilterField for AccountField {
    fn name(&self) -> &'static str {
        match self {
            AccountField::FirstName => "first_name",
            AccountField::LastName => "last_name",
            AccountField::Email => "email",
        }
    }
}

pub type AccountFilter = PredicateSet<AccountField>;

impl Account {
    pub fn field(&self, field: AccountField) -> &str {
        match field {
            AccountField::FirstName => &self.first_name,
            AccountField::LastName => &self.last_name,
            AccountField::Email => &self.email,
        }
    }
}
