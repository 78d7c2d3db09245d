mod app_error;
mod database_converter;
mod constraint_parser;

#[allow(unused_imports)]
pub use app_error::{AppError, AppResult, ValidationFieldError};
pub use database_converter::DatabaseErrorConverter;
pub use constraint_parser::ConstraintParser;
