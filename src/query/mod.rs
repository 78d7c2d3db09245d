pub mod filter;
pub mod page;

pub use filter::{FilterField, PredicateSet, contains_ignore_case, like_pattern};
pub use page::{Page, PageMeta, PageResolver};
