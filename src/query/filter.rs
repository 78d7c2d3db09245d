//! Case-insensitive substring filters shared by count and list queries.
//!
//! A [`PredicateSet`] is built once per request from the raw query-string
//! filters and handed unchanged to both the counting and the listing
//! repository call, so the page metadata always describes the rows returned.

use std::collections::BTreeMap;
use std::fmt::Debug;

/// A column that accepts a "contains" filter.
pub trait FilterField: Copy + Ord + Debug + Send + Sync + 'static {
    /// Query-string parameter and column name.
    fn name(&self) -> &'static str;
}

/// Conjunction of case-insensitive "contains" predicates keyed by field.
///
/// At most one pattern is kept per field; inserting the same field again
/// replaces the previous pattern. Empty patterns are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredicateSet<F: FilterField> {
    predicates: BTreeMap<F, String>,
}

impl<F: FilterField> Default for PredicateSet<F> {
    fn default() -> Self {
        Self {
            predicates: BTreeMap::new(),
        }
    }
}

impl<F: FilterField> PredicateSet<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a predicate when `pattern` is present and non-empty.
    pub fn with(mut self, field: F, pattern: Option<&str>) -> Self {
        self.insert(field, pattern);
        self
    }

    pub fn insert(&mut self, field: F, pattern: Option<&str>) {
        match pattern {
            Some(p) if !p.is_empty() => {
                self.predicates.insert(field, p.to_string());
            }
            _ => {}
        }
    }

    pub fn get(&self, field: F) -> Option<&str> {
        self.predicates.get(&field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (F, &str)> {
        self.predicates.iter().map(|(f, p)| (*f, p.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    /// Evaluates the set against a record in memory.
    ///
    /// `value_of` returns the record's value for a field. Semantics match the
    /// SQL rendering: every predicate must hold, comparison ignores case.
    pub fn matches<'a>(&self, value_of: impl Fn(F) -> &'a str) -> bool {
        self.predicates
            .iter()
            .all(|(field, pattern)| contains_ignore_case(value_of(*field), pattern))
    }
}

/// Renders `pattern` as an `ILIKE` operand matching it as a literal substring.
///
/// `%`, `_` and `\` are escaped with PostgreSQL's default escape character.
pub fn like_pattern(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 2);
    out.push('%');
    for ch in pattern.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('%');
    out
}

pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
