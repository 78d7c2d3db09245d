use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a persisted record.
///
/// Deleted rows stay in the table with `deleted_at` stamped; every read path
/// filters on `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, DbEnum)]
#[db_enum(existing_type_path = "crate::schema::sql_types::RecordState")]
#[serde(rename_all = "lowercase")]
pub enum RecordState {
    Active,
    Deleted,
}

impl std::fmt::Display for RecordState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordState::Active => write!(f, "active"),
            RecordState::Deleted => write!(f, "deleted"),
        }
    }
}
