pub mod password;
pub mod validate;
