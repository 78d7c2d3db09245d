//! Page resolution for list endpoints.
//!
//! Raw `page`/`per_page` inputs come straight from the query string and are
//! frequently zero or negative. [`PageResolver::resolve`] turns them, together
//! with the row count of the filtered collection, into a [`PageMeta`] whose
//! `limit` is always positive and whose `offset` is never negative.

use crate::error::{AppError, AppResult};
use serde::Serialize;
use utoipa::ToSchema;

/// Pagination summary for one page of a list result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct PageMeta {
    /// Current page (1-based, clamped to the last page)
    #[schema(example = 1)]
    pub page: i64,

    /// Rows per page
    #[schema(example = 10)]
    pub per_page: i64,

    /// Number of pages for the filtered collection
    #[schema(example = 3)]
    pub page_count: i64,

    /// Number of rows matching the filters
    #[schema(example = 27)]
    pub total_count: i64,
}

impl PageMeta {
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }
}

/// One page of records plus the metadata describing it.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

/// Resolves caller-supplied paging input against a known row count.
///
/// The default page size is fixed at construction; nothing is read from the
/// environment while resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageResolver {
    default_per_page: i64,
    max_per_page: Option<i64>,
}

impl PageResolver {
    pub fn new(default_per_page: i64) -> Self {
        Self {
            default_per_page,
            max_per_page: None,
        }
    }

    /// Caps the page size. Non-positive values leave the size uncapped.
    pub fn with_max_per_page(mut self, max_per_page: i64) -> Self {
        self.max_per_page = (max_per_page > 0).then_some(max_per_page);
        self
    }

    /// Computes page metadata for `total_count` rows.
    ///
    /// # Arguments
    /// * `page` - Requested page, any value; out-of-range pages clamp to the last page
    /// * `per_page` - Requested page size; `<= 0` selects the default
    /// * `total_count` - Rows matching the filters; negative counts are treated as zero
    ///
    /// # Returns
    /// * `Err(AppError::Configuration)` - Default page size is needed but not positive
    pub fn resolve(&self, page: i64, per_page: i64, total_count: i64) -> AppResult<PageMeta> {
        let mut per_page = if per_page <= 0 {
            if self.default_per_page <= 0 {
                return Err(AppError::Configuration {
                    key: "pagination.default_per_page".to_string(),
                    source: anyhow::anyhow!(
                        "default page size must be positive, got {}",
                        self.default_per_page
                    ),
                });
            }
            self.default_per_page
        } else {
            per_page
        };
        if let Some(max) = self.max_per_page {
            per_page = per_page.min(max);
        }

        let total_count = total_count.max(0);
        let page_count = total_count / per_page + i64::from(total_count % per_page != 0);
        let page = page.min(page_count).max(1);

        Ok(PageMeta {
            page,
            per_page,
            page_count,
            total_count,
        })
    }
}
