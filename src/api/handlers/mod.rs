//! HTTP request handlers, one module per resource.

pub mod accounts;
pub mod courses;
pub mod enrollments;
pub mod health;

#[cfg(test)]
pub(crate) mod test_support;
